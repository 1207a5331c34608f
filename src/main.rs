use geometry_wars::{config::AppConfig, GeometryWarsApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = GeometryWarsApp::new(AppConfig::default())?;
    app.run()
}
