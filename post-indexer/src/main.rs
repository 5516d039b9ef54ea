use clap::{Arg, ArgAction, Command};
use serde_json::Value;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use blog_filter::builder::StoreBuilder;
use utils_common::PostRecord;

// 主函数
fn main() {
    let matches = Command::new("文章存储生成器")
        .version(env!("CARGO_PKG_VERSION"))
        .about("将 JSON 文章数据打包为博客筛选器使用的压缩存储")
        .arg(Arg::new("source")
            .short('s')
            .long("source")
            .value_name("SOURCE_DIR")
            .help("JSON 文章目录路径")
            .required(true))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("OUTPUT_DIR")
            .help("存储输出目录路径")
            .required(true))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("显示详细信息")
            .action(ArgAction::SetTrue))
        .get_matches();

    // required 参数由 clap 保证存在
    let (Some(source_dir), Some(output_dir)) = (
        matches.get_one::<String>("source"),
        matches.get_one::<String>("output"),
    ) else {
        eprintln!("错误: 缺少源目录或输出目录参数");
        std::process::exit(2);
    };
    let verbose = matches.get_flag("verbose");

    let source_path = Path::new(source_dir);
    if !source_path.is_dir() {
        eprintln!("错误: 源目录不存在或不是有效目录 '{}'", source_dir);
        std::process::exit(1);
    }

    let output_path = Path::new(output_dir);
    if let Err(e) = fs::create_dir_all(output_path) {
        eprintln!("错误: 无法创建输出目录 '{}': {}", output_dir, e);
        std::process::exit(1);
    }

    println!("源目录: {}", source_dir);
    println!("输出目录: {}", output_dir);

    match generate_store(source_path, output_path, verbose) {
        Ok(_) => println!("文章存储生成成功！"),
        Err(e) => {
            eprintln!("错误: 文章存储生成失败: {}", e);
            std::process::exit(1);
        }
    }
}

// 扫描、构建并保存存储
fn generate_store(source_dir: &Path, output_dir: &Path, verbose: bool) -> Result<(), String> {
    let start_time = std::time::Instant::now();

    let (posts, skipped) = scan_json_files(source_dir, verbose)?;
    println!("扫描完成。找到 {} 篇文章，跳过 {} 个文件。", posts.len(), skipped);

    let mut builder = StoreBuilder::new();
    for post in posts {
        builder.add_post(post);
    }

    let (store_path, metadata_path) = builder.save(output_dir)?;
    if verbose {
        println!("存储文件: {}", store_path.display());
        println!("元数据文件: {}", metadata_path.display());
    }

    println!("完成！耗时: {:.2}秒", start_time.elapsed().as_secs_f32());
    Ok(())
}

// 递归扫描 JSON 文件，返回 (文章列表, 跳过的文件数)
fn scan_json_files(dir_path: &Path, verbose: bool) -> Result<(Vec<PostRecord>, usize), String> {
    let mut posts = Vec::new();
    let mut skipped = 0;

    for entry in WalkDir::new(dir_path).sort_by_file_name() {
        let entry = entry.map_err(|e| format!("遍历目录时出错: {}", e))?;

        let is_json = entry.path().extension().map_or(false, |ext| ext == "json");
        if !entry.file_type().is_file() || !is_json {
            continue;
        }

        match read_posts(entry.path()) {
            Ok(found) => {
                if verbose {
                    println!("{}: {} 篇文章", entry.path().display(), found.len());
                }
                posts.extend(found);
            }
            Err(err) => {
                skipped += 1;
                if verbose {
                    eprintln!("跳过文件 {}: {}", entry.path().display(), err);
                }
            }
        }
    }

    Ok((posts, skipped))
}

// 单个文件可以是一篇文章对象，也可以是文章数组
fn read_posts(path: &Path) -> Result<Vec<PostRecord>, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("无法读取文件: {}", e))?;
    parse_posts(&text)
}

fn parse_posts(text: &str) -> Result<Vec<PostRecord>, String> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| format!("JSON 解析失败: {}", e))?;

    let result = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|post| vec![post])
    };

    result.map_err(|e| format!("文章格式错误: {}", e))
}
