use anyhow::Result;
use gridplan::cli::{parse_args, Cli, Commands};
use gridplan::commands::{init, layers, priority, report, scenario, validate};
use gridplan::error::GridplanError;
use gridplan::formatting::FormattingConfig;
use gridplan::observability::{init_logging, install_panic_hook};

fn main() {
    let cli = parse_args();
    init_logging(cli.verbose);
    install_panic_hook();

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        let code = err
            .downcast_ref::<GridplanError>()
            .map_or(1, GridplanError::exit_code);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let formatting = if cli.plain {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env()
    };
    formatting.apply();
    let config = cli.config;

    match cli.command {
        Commands::Scenario {
            grid,
            scenario: label,
            threshold,
            bins,
            lenient,
            map_out,
            source_crs,
            format,
            output,
        } => scenario::run_scenario(scenario::ScenarioConfig {
            grid,
            scenario: label,
            threshold,
            bins: bins.map(usize::from),
            lenient,
            map_out,
            source_crs,
            format: format.into(),
            output,
            config,
            formatting,
        }),
        Commands::Priority {
            lines,
            score_attr,
            cost_attr,
            connections_attr,
            map_out,
            source_crs,
            format,
            output,
        } => priority::run_priority(priority::PriorityConfig {
            lines,
            score_attr,
            cost_attr,
            connections_attr,
            map_out,
            source_crs,
            format: format.into(),
            output,
            config,
            formatting,
        }),
        Commands::Layers {
            dir,
            out_dir,
            line_mode,
            source_crs,
            format,
            output,
        } => layers::run_layers(layers::LayersConfig {
            dir,
            out_dir,
            line_mode: line_mode.into(),
            source_crs,
            format: format.into(),
            output,
            config,
            formatting,
        }),
        Commands::Report {
            grid,
            lines,
            title,
            source_crs,
            output,
        } => report::run_report(report::ReportConfig {
            grid,
            lines,
            title,
            source_crs,
            output,
            config,
        }),
        Commands::Init { force } => init::init_config(force),
        Commands::Validate { grid, source_crs } => {
            validate::validate_project(validate::ValidateConfig {
                config,
                grid,
                source_crs,
                formatting,
            })
        }
    }
}
