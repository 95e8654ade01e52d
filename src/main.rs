// SPDX-License-Identifier: MPL-2.0
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use toastbox::notifications::{
    RenderPass, ShowOptions, ToastKind, ToastPatch, ToastRegistry, ToastView, Toaster,
};
use toastbox::{config, logging, paths};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, Default)]
enum Scenario {
    #[default]
    Basic,
    Loading,
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Scenario::Basic),
            "loading" => Ok(Scenario::Loading),
            other => Err(format!("unknown scenario `{other}` (expected basic or loading)")),
        }
    }
}

struct Flags {
    config_dir: Option<String>,
    scenario: Scenario,
}

fn parse_flags() -> Result<Flags, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    Ok(Flags {
        config_dir: args.opt_value_from_str("--config-dir")?,
        scenario: args.opt_value_from_str("--scenario")?.unwrap_or_default(),
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let flags = match parse_flags() {
        Ok(flags) => flags,
        Err(err) => {
            eprintln!("toastbox: {err}");
            return ExitCode::FAILURE;
        }
    };

    paths::init_cli_override(flags.config_dir);
    let (config, warning) = config::load();
    logging::init(&config);
    if let Some(warning) = warning {
        warn!(%warning, "falling back to default settings");
    }

    let registry = match ToastRegistry::new(config.registry_settings()) {
        Ok(registry) => registry,
        Err(err) => {
            error!(%err, "cannot start toast registry");
            return ExitCode::FAILURE;
        }
    };

    let _toaster = Toaster::attach_with(&registry, |_: &RenderPass, views: &[ToastView]| {
        println!("--");
        for view in views {
            println!("{}", view.line());
        }
    });

    info!(scenario = ?flags.scenario, "running");
    match flags.scenario {
        Scenario::Basic => basic(&registry).await,
        Scenario::Loading => loading(&registry).await,
    }

    let mut latest = registry.watch();
    while !latest.borrow_and_update().is_empty() {
        if latest.changed().await.is_err() {
            break;
        }
    }
    info!("all toasts retired");
    ExitCode::SUCCESS
}

async fn basic(registry: &ToastRegistry) {
    let a = registry.info("A", ShowOptions::new().duration_ms(1_500));
    registry.danger("B", ShowOptions::new().duration_ms(3_000));
    tokio::time::sleep(Duration::from_millis(500)).await;
    registry.dismiss(&a);

    let c = registry.loading("C", ShowOptions::new());
    tokio::time::sleep(Duration::from_secs(2)).await;
    registry.update(
        &c,
        ToastPatch::new()
            .kind(ToastKind::Success)
            .message("C done")
            .duration_ms(1_000),
    );
}

async fn loading(registry: &ToastRegistry) {
    let id = registry.loading("Uploading", ShowOptions::new().dismissible(false));
    for percent in [25, 50, 75] {
        tokio::time::sleep(Duration::from_millis(600)).await;
        registry.update(&id, ToastPatch::new().message(format!("Uploading {percent}%")));
    }
    tokio::time::sleep(Duration::from_millis(600)).await;
    registry.update(
        &id,
        ToastPatch::new()
            .kind(ToastKind::Success)
            .message("Upload complete")
            .dismissible(true)
            .duration_ms(1_500),
    );
}
