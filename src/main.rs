//! hybridx-sim: replay a lifecycle script against a logging host and print
//! every directive the shell sends to the native window and the renderer.
//!
//! Steps are given as arguments (or `HYBRIDX_SIM_STEPS`, space separated):
//!
//! ```text
//! create | layout:L,T,R,B | loaded | resume | pause | reply:ID:OUTCOME | mode:NAME
//! ```

use anyhow::{anyhow, bail, Context, Result};
use hybridx_shell::{
    script, BridgeOutcome, BridgeRequest, ChromeCapabilities, ChromeUpdate, InsetSnapshot,
    LayoutMode, LifecycleCoordinator, NativeChrome, PersistenceConfig, RendererBridge,
    ReportedInsets, RequestId, ShellConfig, ShellHost, ShellSettings, StorageBackend,
};

const DEFAULT_STEPS: &str = "create layout:0,48,0,24 loaded pause resume reply:1:unavailable";

#[derive(Debug, Clone, PartialEq)]
enum Step {
    Create,
    Layout(InsetSnapshot),
    Loaded,
    Resume,
    Pause,
    Reply(RequestId, BridgeOutcome),
    Mode(LayoutMode),
}

fn parse_step(token: &str) -> Result<Step> {
    let (name, arg) = token.split_once(':').unwrap_or((token, ""));
    Ok(match name {
        "create" => Step::Create,
        "loaded" => Step::Loaded,
        "resume" => Step::Resume,
        "pause" => Step::Pause,
        "layout" => {
            let values = arg
                .split(',')
                .map(|v| v.trim().parse::<f32>())
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("bad insets in `{}`", token))?;
            let [l, t, r, b] = values[..] else {
                bail!("`{}` needs four insets", token);
            };
            Step::Layout(InsetSnapshot::new(l, t, r, b))
        }
        "reply" => {
            let (id, outcome) = arg
                .split_once(':')
                .ok_or_else(|| anyhow!("`{}` needs reply:ID:OUTCOME", token))?;
            let id = id.parse::<u64>().with_context(|| format!("bad id in `{}`", token))?;
            Step::Reply(RequestId(id), BridgeOutcome::from_report(outcome))
        }
        "mode" => Step::Mode(
            LayoutMode::parse(arg).ok_or_else(|| anyhow!("unknown layout mode `{}`", arg))?,
        ),
        other => bail!("unknown step `{}`", other),
    })
}

struct PrintChrome;

impl NativeChrome for PrintChrome {
    fn commit(&mut self, update: &ChromeUpdate) {
        println!(
            "  window.commit status={:?} navigation={:?} icons={:?}",
            update.status_bar_color, update.navigation_bar_color, update.icon_theme
        );
    }

    fn set_edge_to_edge(&mut self, edge_to_edge: bool) {
        println!("  window.edge_to_edge={}", edge_to_edge);
    }

    fn set_content_padding(&mut self, p: InsetSnapshot) {
        println!("  window.padding left={} top={} right={} bottom={}", p.left, p.top, p.right, p.bottom);
    }
}

struct PrintBridge;

impl RendererBridge for PrintBridge {
    fn post(&mut self, id: RequestId, request: &BridgeRequest) -> hybridx_shell::Result<()> {
        println!("  renderer.post {} {}", id, request.name());
        log::debug!("{}", script::render(id, request));
        Ok(())
    }
}

struct PrintStorage;

impl StorageBackend for PrintStorage {
    fn apply(&mut self, config: &PersistenceConfig) -> hybridx_shell::Result<()> {
        println!("  storage.apply {:?}", config);
        Ok(())
    }

    fn flush(&mut self) -> hybridx_shell::Result<()> {
        println!("  storage.flush");
        Ok(())
    }
}

fn run(shell: &mut LifecycleCoordinator, insets: &ReportedInsets, step: &Step) -> Result<()> {
    match step {
        Step::Create => {
            shell.on_created()?;
            if let Some(url) = shell.start_url() {
                println!("  navigate {}", url);
            }
        }
        Step::Layout(snapshot) => {
            insets.report(*snapshot);
            shell.on_layout_pass();
        }
        Step::Loaded => shell.on_content_loaded(),
        Step::Resume => shell.on_resumed(),
        Step::Pause => shell.on_paused(),
        Step::Reply(id, outcome) => shell.on_bridge_reply(*id, outcome.clone()),
        Step::Mode(mode) => shell.set_layout_mode(*mode),
    }
    Ok(())
}

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let config = ShellConfig::load();
    let settings = ShellSettings::from_config(&config).context("Invalid shell settings")?;

    let mut tokens: Vec<String> = std::env::args().skip(1).collect();
    if tokens.is_empty() {
        let steps = std::env::var("HYBRIDX_SIM_STEPS").unwrap_or_else(|_| DEFAULT_STEPS.to_string());
        tokens = steps.split_whitespace().map(str::to_string).collect();
    }
    let steps = tokens.iter().map(|t| parse_step(t)).collect::<Result<Vec<_>>>()?;

    let insets = ReportedInsets::new(ChromeCapabilities {
        chrome_color: true,
        icon_theme: true,
    });
    let mut shell = LifecycleCoordinator::new(
        settings,
        ShellHost {
            insets: Box::new(insets.clone()),
            chrome: Box::new(PrintChrome),
            bridge: Box::new(PrintBridge),
            storage: Box::new(PrintStorage),
        },
    );

    println!("{} ({:?})", config.app.name, shell.layout_mode());
    for (token, step) in tokens.iter().zip(&steps) {
        println!("{}", token);
        run(&mut shell, &insets, step)?;
    }
    Ok(())
}
