mod common;
mod config;
mod network;
mod server;
mod ui;

use std::error::Error;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use network::{ChatClient, NetworkWorker};
use tokio::sync::mpsc;
use ui::{ChatApp, ChatWidget};

use config::AppConfig;

#[derive(Parser)]
#[command(
    name = "rust_chat_widget",
    version,
    about = "Floating chat widget and its /chat backend"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Override the /chat endpoint URL
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, PartialEq, Eq)]
enum Mode {
    /// Run the /chat backend (no UI)
    Serve {
        /// Address to bind, e.g. 127.0.0.1:5000
        #[arg(long, value_name = "ADDR")]
        listen: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();

    let cli = Cli::parse();
    let app_config = config::load_config(&cli.config).with_endpoint_override(cli.endpoint);

    match cli.mode {
        Some(Mode::Serve { listen }) => {
            let listen = listen.unwrap_or_else(|| app_config.listen.clone());
            if let Err(err) = server::serve(&listen).await {
                log::error!("Chat backend terminated: {err}");
                return Err(err.into());
            }
            Ok(())
        }
        None => run_widget(app_config).await.map_err(Into::into),
    }
}

async fn run_widget(app_config: AppConfig) -> Result<(), eframe::Error> {
    // 1. Tạo các kênh giao tiếp (Channels)
    // UI -> Network
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Network -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    // 2. Khởi chạy Network Thread (Chạy ngầm)
    let client = ChatClient::new(app_config.endpoint.clone());
    tokio::spawn(NetworkWorker::new(client, event_tx, cmd_rx).run());

    // 3. Khởi chạy UI (Chạy trên Main Thread)
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([900.0, 700.0]),
        ..Default::default()
    };
    let mut event_rx = Some(event_rx);
    let window_title = app_config.title.clone();

    eframe::run_native(
        &window_title,
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .expect("ChatApp should only be initialized once");

            log::info!("Widget started, posting to {}", app_config.endpoint);

            let widget = ChatWidget::new(cmd_tx.clone(), app_config.greeting.clone());
            Ok(Box::new(ChatApp::new(
                cc,
                widget,
                event_receiver,
                app_config.title.clone(),
                app_config.debug_panel,
            )))
        }),
    )
}
