// tripreel-cli/src/config.rs
//
// Maps global flags and per-command assembly options onto CoreConfig.

use crate::cli::{AssemblyArgs, Cli};
use crate::error::CliResult;
use std::path::PathBuf;
use tripreel_core::{CoreConfig, CoreConfigBuilder};

/// Log directory for this invocation.
pub fn log_dir(cli: &Cli) -> PathBuf {
    cli.log_dir
        .clone()
        .unwrap_or_else(|| cli.work_dir.join("logs"))
}

/// Config carrying only the global flags.
pub fn base_config(cli: &Cli) -> CoreConfig {
    CoreConfigBuilder::new()
        .store_dir(cli.store.clone())
        .work_dir(cli.work_dir.clone())
        .log_dir(log_dir(cli))
        .build()
}

/// Config for an assembly run; validated, but not required to name an
/// audio track (callers check that with `validate_for_assembly`).
pub fn assembly_config(cli: &Cli, args: &AssemblyArgs) -> CliResult<CoreConfig> {
    let mut config = base_config(cli);
    if let Some(audio) = &args.audio {
        config.audio_track = Some(audio.clone());
    }
    if let Some(fade) = args.fade {
        config.fade_secs = fade;
    }
    if let Some(codec) = &args.video_codec {
        config.video_codec = codec.clone();
    }
    if let Some(codec) = &args.audio_codec {
        config.audio_codec = codec.clone();
    }
    if let Some(policy) = args.audio_fit {
        config.audio_fit_policy = policy;
    }
    if let Some(dir) = &args.temp_dir {
        config.temp_dir = Some(dir.clone());
    }
    if let Some(topic) = &args.ntfy {
        config.ntfy_topic = Some(topic.clone());
    }

    config.validate()?;
    Ok(config)
}
