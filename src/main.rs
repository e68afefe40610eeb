use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use eframe::egui_wgpu;
use tracing_subscriber::EnvFilter;

use plotdrop::app::PlotDropApp;
use plotdrop::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "plotdrop")]
#[command(version, about = "Drop CSV files, pick columns, plot them", long_about = None)]
struct Args {
    /// CSV files to load at startup, in order
    files: Vec<PathBuf>,

    /// Configuration file (default: <config dir>/plotdrop/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load(args.config.as_deref());
    tracing::info!("Starting PlotDrop {}", env!("CARGO_PKG_VERSION"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("PlotDrop")
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([640.0, 400.0])
            .with_drag_and_drop(true),
        wgpu_options: egui_wgpu::WgpuConfiguration {
            present_mode: eframe::wgpu::PresentMode::AutoVsync,
            wgpu_setup: egui_wgpu::WgpuSetup::CreateNew(egui_wgpu::WgpuSetupCreateNew {
                instance_descriptor: eframe::wgpu::InstanceDescriptor {
                    backends: eframe::wgpu::Backends::DX12
                        | eframe::wgpu::Backends::VULKAN
                        | eframe::wgpu::Backends::GL,
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    };

    let files = args.files;
    eframe::run_native(
        "PlotDrop",
        options,
        Box::new(move |cc| Ok(Box::new(PlotDropApp::new(cc, config, files)))),
    )
}
