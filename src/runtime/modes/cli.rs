//! 一次性命令行操作

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::cli::JobCommands;
use crate::config::StaticConfig;
use crate::jobs::{CleanupJob, ReportJob};
use crate::storage::StorageFactory;

/// 立即执行一次定时任务
pub async fn run_job(job: JobCommands, config: &StaticConfig) -> Result<()> {
    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;

    match job {
        JobCommands::Cleanup => {
            let report = CleanupJob::from_config(storage, &config.jobs)
                .run()
                .await
                .map_err(|e| anyhow::anyhow!(e.format_simple()))?;
            println!(
                "{} {} {}",
                "Cleanup finished:".green(),
                report.deleted.to_string().bold(),
                format!("events older than {} deleted", report.cutoff).dimmed()
            );
        }
        JobCommands::Report => {
            let report = ReportJob::from_config(storage, &config.jobs)
                .run()
                .await
                .map_err(|e| anyhow::anyhow!(e.format_simple()))?;
            println!(
                "{} {}",
                "Weekly report generated:".green(),
                serde_json::to_string_pretty(&report)?
            );
        }
    }

    Ok(())
}

/// 生成示例配置文件
pub fn config_generate(output_path: Option<String>, force: bool) -> Result<()> {
    let path = output_path.unwrap_or_else(|| "config.example.toml".to_string());

    if !force && Path::new(&path).exists() {
        print!(
            "{} {} {}",
            "File already exists:".yellow(),
            path.blue(),
            "Overwrite? [y/N] ".yellow()
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", "Aborted.".red());
            return Ok(());
        }
    }

    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    StaticConfig::default()
        .save_to_file(&path)
        .map_err(|e| anyhow::anyhow!("Unable to write configuration file: {}", e))?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    println!(
        "  {}",
        "Please edit the configuration file and restart the service".yellow()
    );
    Ok(())
}
