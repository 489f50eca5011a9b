// author: kodeholic (powered by Gemini)

use std::fs::OpenOptions;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use spk_server::{config, run_server, ServerArgs};

#[derive(Parser)]
#[command(
    name  = "spk-srv",
    about = "Voice announcement server for radio repeaters and hotspots",
    version,
)]
struct Cli {
    /// UDP 바인드 포트
    #[arg(short = 'p', long = "port", default_value_t = config::DEFAULT_UDP_PORT)]
    port: u16,

    /// UDP 바인드 IP
    #[arg(short = 'i', long = "ip", default_value = config::DEFAULT_BIND_IP)]
    bind_ip: IpAddr,

    /// 로그 출력 완전 비활성화
    #[arg(short = 's', long = "silent")]
    silent: bool,

    /// stdout 과 함께 spk-srv.log 에도 기록 (-s 지정 시 무시)
    #[arg(short = 'f', long = "log-file")]
    log_file: bool,

    /// 음성 에셋 루트 디렉터리
    #[arg(short = 'd', long = "voices", default_value = config::DEFAULT_VOICES_DIR)]
    voices_dir: PathBuf,
}

fn init_logging(cli: &Cli) {
    if cli.silent {
        return;
    }

    // 환경 변수 기반 로깅 필터 (기본값: info)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if !cli.log_file {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return;
    }

    match OpenOptions::new().create(true).append(true).open(config::LOG_FILE_NAME) {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::io::stdout.and(Mutex::new(file)))
                .init();
        }
        Err(e) => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            warn!("can't open {} for writing: {}", config::LOG_FILE_NAME, e);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let args = ServerArgs {
        bind_ip:    cli.bind_ip,
        port:       cli.port,
        voices_dir: cli.voices_dir,
    };

    if run_server(args).await.is_err() {
        std::process::exit(1);
    }
}
