mod app;
mod model;
mod table;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let Some(app) = app::CloudApp::bootstrap() else {
        return Ok(());
    };

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Cloud Cull",
        native_options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
