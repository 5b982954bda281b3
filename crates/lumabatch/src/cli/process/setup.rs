//! Turning CLI flags and config into explicit processing options.

use lumabatch_core::{Config, LumaParameters, Transform};

use super::types::Function;
use super::{ProcessArgs, ProcessContext};

/// Resolve the transform and worker count for this run.
///
/// Flags win over config values; the library never sees the config itself.
pub fn setup_processor(args: &ProcessArgs, config: &Config) -> ProcessContext {
    let transform = resolve_transform(args, config);
    let workers = args.threads.unwrap_or(config.processing.parallel_workers);

    tracing::debug!("Transform: {:?}", transform);
    tracing::debug!(
        "Workers requested: {}",
        if workers == 0 {
            "auto".to_string()
        } else {
            workers.to_string()
        }
    );

    ProcessContext { transform, workers }
}

fn resolve_transform(args: &ProcessArgs, config: &Config) -> Transform {
    match args.function {
        Function::Luma2Alpha => {
            let mut params = LumaParameters::default();
            if let Some(threshold) = args.threshold {
                params.threshold = threshold;
            }
            Transform::LumaToAlpha(params)
        }
        Function::Luma2AlphaCustom => {
            let saved = config.luma.parameters();
            Transform::LumaToAlpha(LumaParameters {
                coef_r: args.coef_r.unwrap_or(saved.coef_r),
                coef_g: args.coef_g.unwrap_or(saved.coef_g),
                coef_b: args.coef_b.unwrap_or(saved.coef_b),
                threshold: args.threshold.unwrap_or(saved.threshold),
            })
        }
        Function::Png => Transform::ConvertToPng,
    }
}
