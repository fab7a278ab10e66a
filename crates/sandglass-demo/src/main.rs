mod scenes;

use std::time::Duration;

use anyhow::Result;
use sandglass_engine::core::App;
use sandglass_engine::host::{Runtime, RuntimeConfig};
use sandglass_engine::logging::{init_logging, LoggingConfig};

use scenes::{
    AwaitedDelayScene, CancelButtonScene, CustomTimeScaleScene, DelayScene, RepeatForeverScene,
    SelfDestroyScene,
};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    // `--paced` runs at wall-clock speed; otherwise frames advance 1/60 s each
    // without sleeping.
    let paced = std::env::args().skip(1).any(|arg| arg == "--paced");
    let config = RuntimeConfig {
        frame_interval: paced.then(|| Duration::from_secs(1) / 60),
        max_frames: Some(600),
        fixed_dt: (!paced).then(|| Duration::from_secs(1) / 60),
        ..RuntimeConfig::default()
    };

    run_scene("delay", &config, DelayScene::default())?;
    run_scene("cancel button", &config, CancelButtonScene::new(30))?;
    run_scene("awaited delay", &config, AwaitedDelayScene::new(45))?;
    run_scene("repeat forever", &config, RepeatForeverScene::new(90))?;
    run_scene("custom time scale", &config, CustomTimeScaleScene::new(2.0))?;
    run_scene("self destroy", &config, SelfDestroyScene::new(20))?;

    log::info!("all scenes done");
    Ok(())
}

fn run_scene<A: App>(name: &str, config: &RuntimeConfig, scene: A) -> Result<A> {
    log::info!("── {name} ──");
    Runtime::run(config.clone(), scene)
}
