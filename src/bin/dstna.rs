use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dstna_rs::viz::{self, ChartFormat, ChartSize};
use dstna_rs::{Client, JoinPolicy, PipelineConfig};
use env_logger::Env;
use num_format::ToFormattedString;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "dstna",
    version,
    about = "Fetch, merge, summarize & chart Danish national accounts (StatBank NAN1)"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline: fetch, merge, derive, summarize and chart.
    Run(RunArgs),
    /// List the variables (and their first values) of a StatBank table.
    Variables(VariablesArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// First year of the analysis window (base year).
    #[arg(long)]
    start: Option<i32>,
    /// Last year of the analysis window.
    #[arg(long)]
    end: Option<i32>,
    /// Response language (da or en); decides the decimal separator.
    #[arg(long)]
    lang: Option<String>,
    /// How growth rates are joined onto levels.
    #[arg(long, value_enum)]
    growth_join: Option<JoinPolicy>,
    /// Directory the charts are written to.
    #[arg(long, default_value = "charts")]
    out_dir: PathBuf,
    /// Chart file format.
    #[arg(long, value_enum, default_value_t = ChartFormat::Svg)]
    format: ChartFormat,
    /// Width of each chart (default 1200).
    #[arg(long, default_value_t = 1200)]
    width: u32,
    /// Height of each chart (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Only print the summary table.
    #[arg(long, default_value_t = false)]
    no_charts: bool,
}

#[derive(Args, Debug)]
struct VariablesArgs {
    /// Table id (e.g., NAN1)
    #[arg(long, default_value = "NAN1")]
    table: String,
    #[arg(long, default_value = "da")]
    lang: String,
    /// Maximum number of values printed per variable.
    #[arg(long, default_value_t = 20)]
    limit: usize,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{x:.2}"),
        _ => "NA".to_string(),
    }
}

/// Level with locale grouping, e.g. `1.234.567,8` for Danish.
fn fmt_level(v: f64, lang: &str) -> String {
    let (locale, decimal) = viz::util::map_locale(lang);
    let tenths = (v.abs() * 10.0).round() as i64;
    let sign = if v < 0.0 && tenths != 0 { "-" } else { "" };
    format!(
        "{sign}{}{decimal}{}",
        (tenths / 10).to_formatted_string(locale),
        tenths % 10
    )
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Variables(args) => cmd_variables(args),
    }
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let mut cfg = match args.config.as_ref() {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(start) = args.start {
        cfg.window.start = start;
    }
    if let Some(end) = args.end {
        cfg.window.end = end;
    }
    if let Some(lang) = args.lang {
        cfg.lang = lang;
    }
    if let Some(policy) = args.growth_join {
        cfg.growth_join = policy;
    }

    let client = Client::default().with_lang(&cfg.lang);
    let output = dstna_rs::run(&client, &cfg)?;

    let summary = &output.summary;
    println!(
        "{:<26} {:>12} {:>12} {:>10} {:>10}",
        "Series",
        format!("{}", summary.base_year),
        format!("{}", summary.end_year),
        "Total %",
        "Avg. %"
    );
    for row in &summary.rows {
        println!(
            "{:<26} {:>12} {:>12} {:>10} {:>10}",
            row.label,
            fmt_level(row.level_base, &cfg.lang),
            fmt_level(row.level_end, &cfg.lang),
            fmt_opt(Some(row.total_change_pct)),
            fmt_opt(row.average_change_pct)
        );
    }

    if !args.no_charts {
        let size = ChartSize {
            width: args.width,
            height: args.height,
        };
        let written = viz::render_all(&output, &cfg, &args.out_dir, args.format, size)?;
        eprintln!(
            "Wrote {} charts to {}",
            written.len(),
            args.out_dir.display()
        );
    }
    Ok(())
}

fn cmd_variables(args: VariablesArgs) -> Result<()> {
    let client = Client::default().with_lang(&args.lang);
    let info = client.table_info(&args.table)?;
    println!("{} - {}", info.id, info.text);
    if let Some(unit) = &info.unit {
        println!("unit: {unit}");
    }
    if let Some(updated) = &info.updated {
        println!("updated: {updated}");
    }
    for var in &info.variables {
        let kind = if var.time { " (time)" } else { "" };
        println!("\n{}{}: {}", var.id, kind, var.text);
        for value in var.values.iter().take(args.limit) {
            println!("  {:<12} {}", value.id, value.text);
        }
        if var.values.len() > args.limit {
            println!("  ... {} more", var.values.len() - args.limit);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_use_locale_grouping() {
        assert_eq!(fmt_level(1234567.84, "da"), "1.234.567,8");
        assert_eq!(fmt_level(-1234.5, "en"), "-1,234.5");
        assert_eq!(fmt_level(0.0, "en"), "0.0");
    }

    #[test]
    fn missing_values_print_na() {
        assert_eq!(fmt_opt(None), "NA");
        assert_eq!(fmt_opt(Some(f64::NAN)), "NA");
        assert_eq!(fmt_opt(Some(1.234)), "1.23");
    }
}
