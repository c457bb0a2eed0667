//! 程序入口
//!
//! 配置优先级：MINIAPP_CONFIG 指向的 TOML 文件 > 环境变量 > 默认值。

use std::path::Path;

use anyhow::Result;

use msr_miniapp_engine::app::App;
use msr_miniapp_engine::config::Config;
use msr_miniapp_engine::utils::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = match std::env::var("MINIAPP_CONFIG") {
        Ok(path) => Config::from_toml_file(Path::new(&path))?,
        Err(_) => Config::from_env(),
    };

    logging::init(config.verbose_logging);

    let mut app = App::initialize(config)?;
    app.run().await?;
    Ok(())
}
