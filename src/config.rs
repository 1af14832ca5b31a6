use morphovec::{Architecture, Config, ConfigBuilder};

use crate::app::Args;

/// Builds a [`morphovec::Config`] from parsed CLI arguments, applying the
/// architecture-dependent default learning rate when `-alpha` was not
/// given explicitly.
pub fn config_from_args(args: &Args) -> anyhow::Result<Config> {
    let architecture = if args.cbow {
        Architecture::Cbow
    } else {
        Architecture::SkipGram
    };

    let alpha0 = args
        .alpha
        .unwrap_or_else(|| morphovec::default_alpha(architecture));

    ConfigBuilder::new()
        .dims(args.size)
        .window(args.window)
        .epochs(args.iter)
        .threads(args.threads)
        .architecture(architecture)
        .hierarchical_softmax(args.hs)
        .negative_samples(args.negative)
        .sample(args.sample)
        .alpha0(alpha0)
        .min_count(args.min_count)
        .build()
        .map_err(anyhow::Error::from)
}
