use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use clap::Parser;
use log::{info, LevelFilter};
use thiserror::Error;
use fountain_fdx::{write_document, Conf, ConfError, FountainParser};

/// 把 Fountain 剧本转换为 Final Draft (FDX)
#[derive(Debug, Parser)]
#[command(name = "fountain-fdx", version, about)]
struct Cli {
    /// 输入文件，省略时读取标准输入
    input: Option<PathBuf>,

    /// 输出文件，省略时写到标准输出
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 没有规则匹配时使用的元素类型(默认 General)
    #[arg(long, value_name = "ELEMENT")]
    fallback: Option<String>,

    /// JSON 配置文件
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 不识别双对话
    #[arg(long)]
    no_dual: bool,

    /// 输出分类后的文档结构(JSON)而不是 FDX
    #[arg(long)]
    json: bool,

    /// 日志详细程度(-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("IO错误: {0}")]
    IoError(#[from] io::Error),

    #[error(transparent)]
    Conf(#[from] ConfError),

    #[error("JSON输出失败: {0}")]
    JsonError(#[from] serde_json::Error),
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::from_default_env();
    // RUST_LOG 只在没有 -v 时生效
    if verbose > 0 || std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(level);
    }
    builder.target(env_logger::Target::Stderr).init();
}

// 配置文件在前，命令行参数覆盖
fn load_conf(cli: &Cli) -> Result<Conf, CliError> {
    let mut conf = match &cli.config {
        Some(path) => Conf::from_file(path)?,
        None => Conf::default(),
    };
    if let Some(name) = &cli.fallback {
        conf = conf.with_fallback(name)?;
    }
    if cli.no_dual {
        conf.use_dual_dialogue = false;
    }
    Ok(conf)
}

fn read_input(cli: &Cli) -> Result<String, CliError> {
    let content = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    Ok(content)
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let conf = load_conf(cli)?;
    let script = read_input(cli)?;

    let parser = FountainParser::new(conf);
    let document = parser.parse(&script);
    info!("段落数量: {}", document.len());
    info!("双对话数量: {}", document.groups.len());

    let output = if cli.json {
        serde_json::to_string_pretty(&document)?
    } else {
        write_document(&document, parser.conf())
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, output)?;
            info!("FDX输出已保存到: {}", path.display());
        }
        None => io::stdout().write_all(output.as_bytes())?,
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("转换失败: {}", e);
        std::process::exit(1);
    }
}
