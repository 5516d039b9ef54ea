use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use std::io::{self, Read, Write};

/// 魔数 - 标识文章存储文件格式
pub const MAGIC_BYTES: &[u8] = b"BLGPS";

/// 当前写入的格式版本
pub const STORE_VERSION: [u8; 2] = [1, 0];

/// 读取时支持的最大主版本号
pub const MAX_SUPPORTED_MAJOR: u8 = 1;

/// 头部长度：魔数 + 版本号(2) + 原始长度(4)
const HEADER_LEN: usize = MAGIC_BYTES.len() + 2 + 4;

/// 解压缓冲区的最大预分配大小；头部声明的长度不可信
const MAX_PREALLOC: usize = 16 * 1024 * 1024;

fn invalid_data(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

/// 将对象序列化为二进制格式
pub fn to_binary<T: serde::Serialize>(obj: &T) -> Result<Vec<u8>, io::Error> {
    bincode::serde::encode_to_vec(obj, bincode::config::standard())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("序列化失败: {}", e)))
}

/// 从二进制格式反序列化对象
pub fn from_binary<T: for<'a> serde::de::Deserialize<'a>>(data: &[u8]) -> Result<T, io::Error> {
    bincode::serde::decode_from_slice(data, bincode::config::standard())
        .map_err(|e| invalid_data(format!("反序列化失败: {}", e)))
        .map(|(value, _)| value)
}

/// 将对象序列化并压缩，附带魔数、版本号与原始长度
pub fn to_compressed<T: serde::Serialize>(obj: &T, version: [u8; 2]) -> Result<Vec<u8>, io::Error> {
    let binary = to_binary(obj)?;
    let raw_len = u32::try_from(binary.len())
        .map_err(|_| invalid_data(format!("数据过大: {} 字节", binary.len())))?;

    let mut output = Vec::with_capacity(HEADER_LEN + binary.len() / 2);
    output.extend_from_slice(MAGIC_BYTES);
    output.extend_from_slice(&version);
    output.extend_from_slice(&raw_len.to_le_bytes());

    let mut encoder = GzEncoder::new(output, Compression::best());
    encoder.write_all(&binary)?;
    encoder.finish()
}

/// 解析并校验头部，返回 (版本号, 原始长度)
fn read_header(data: &[u8], max_version: u8) -> Result<([u8; 2], u32), io::Error> {
    if data.len() < HEADER_LEN {
        return Err(invalid_data(format!("数据太短，无法解析: {} 字节", data.len())));
    }

    if &data[..MAGIC_BYTES.len()] != MAGIC_BYTES {
        return Err(invalid_data("无效的文件格式：魔数不匹配"));
    }

    let version_offset = MAGIC_BYTES.len();
    let version = [data[version_offset], data[version_offset + 1]];
    if version[0] > max_version {
        return Err(invalid_data(format!("不支持的版本: {}.{}", version[0], version[1])));
    }

    let mut size_bytes = [0u8; 4];
    size_bytes.copy_from_slice(&data[version_offset + 2..HEADER_LEN]);

    Ok((version, u32::from_le_bytes(size_bytes)))
}

/// 解压并反序列化，使用当前支持的最大版本
pub fn from_compressed<T: for<'a> serde::de::Deserialize<'a>>(data: &[u8]) -> Result<T, io::Error> {
    from_compressed_with_max_version(data, MAX_SUPPORTED_MAJOR)
}

/// 解压并反序列化，允许指定支持的最大主版本号
pub fn from_compressed_with_max_version<T: for<'a> serde::de::Deserialize<'a>>(
    data: &[u8],
    max_version: u8,
) -> Result<T, io::Error> {
    let (_, original_size) = read_header(data, max_version)?;

    // 最多多读一个字节，超出声明长度即判定不匹配，不会继续解压
    let mut decoder = GzDecoder::new(&data[HEADER_LEN..]).take(u64::from(original_size) + 1);
    let mut decompressed = Vec::with_capacity(MAX_PREALLOC.min(original_size as usize));
    decoder.read_to_end(&mut decompressed)?;

    if decompressed.len() as u64 != u64::from(original_size) {
        return Err(invalid_data(format!(
            "解压后数据大小不匹配: 期望 {} 字节, 实际 {} 字节",
            original_size,
            decompressed.len()
        )));
    }

    from_binary(&decompressed)
}

/// 仅校验头部，返回文件的版本号
pub fn validate_compressed_data(data: &[u8]) -> Result<[u8; 2], io::Error> {
    read_header(data, MAX_SUPPORTED_MAJOR).map(|(version, _)| version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PostRecord, StorePayload};

    fn payload() -> StorePayload {
        StorePayload {
            posts: vec![PostRecord {
                id: 1,
                title: "The Art of Minimalism".to_string(),
                excerpt: "Less is more.".to_string(),
                date: "March 11, 2025".to_string(),
                topics: vec!["design".to_string()],
                tags: vec!["ui-ux".to_string()],
                url: "post1.html".to_string(),
            }],
        }
    }

    #[test]
    fn compressed_store_keeps_posts() {
        let bytes = to_compressed(&payload(), STORE_VERSION).unwrap();
        assert_eq!(&bytes[..MAGIC_BYTES.len()], MAGIC_BYTES);
        assert_eq!(validate_compressed_data(&bytes).unwrap(), STORE_VERSION);

        let decoded: StorePayload = from_compressed(&bytes).unwrap();
        assert_eq!(decoded.posts, payload().posts);
    }

    #[test]
    fn rejects_short_input() {
        let err = validate_compressed_data(b"BLG").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn rejects_wrong_magic() {
        let mut bytes = to_compressed(&payload(), STORE_VERSION).unwrap();
        bytes[0] = b'X';
        assert!(from_compressed::<StorePayload>(&bytes).is_err());
    }

    #[test]
    fn rejects_newer_major_version() {
        let bytes = to_compressed(&payload(), [MAX_SUPPORTED_MAJOR + 1, 0]).unwrap();
        let err = from_compressed::<StorePayload>(&bytes).unwrap_err();
        assert!(err.to_string().contains("不支持的版本"));
    }

    fn with_declared_length(body: &[u8], declared: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC_BYTES);
        bytes.extend_from_slice(&STORE_VERSION);
        bytes.extend_from_slice(&declared.to_le_bytes());
        let mut encoder = GzEncoder::new(bytes, Compression::best());
        encoder.write_all(body).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn oversized_declared_length_is_an_error() {
        let body = to_binary(&payload()).unwrap();
        let bytes = with_declared_length(&body, u32::MAX);

        let err = from_compressed::<StorePayload>(&bytes).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("解压后数据大小不匹配"));
    }

    #[test]
    fn stops_inflating_past_declared_length() {
        // 64 MiB 的零字节压缩后只有几十 KB
        let bomb = vec![0u8; 64 * 1024 * 1024];
        let bytes = with_declared_length(&bomb, 16);
        assert!(bytes.len() < 1024 * 1024);

        let err = from_compressed::<StorePayload>(&bytes).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("实际 17 字节"));
    }

    #[test]
    fn rejects_length_mismatch() {
        let mut bytes = to_compressed(&payload(), STORE_VERSION).unwrap();
        let len_offset = MAGIC_BYTES.len() + 2;
        bytes[len_offset] = bytes[len_offset].wrapping_add(1);
        assert!(from_compressed::<StorePayload>(&bytes).is_err());
    }
}
