//! Terminal front-end: launch an analysis, follow the live progress channel,
//! then render the ranked toxic-item digest.

use clap::Parser;
use colored::*;
use std::io::{self, Write};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use toxilens::categories::{resolve, Severity};
use toxilens::cli::{clamp_max_comments, resolve_base_url, Args};
use toxilens::client::{ClientConfig, ToxiClient};
use toxilens::digest::aggregate;
use toxilens::history::{HistoryEntry, HistoryStats};
use toxilens::protocol::{AnalysisRequest, AnalysisResult, CommentRecord};
use toxilens::session;

fn severity_label(severity: Severity) -> ColoredString {
    let text = severity.to_string();
    match severity {
        Severity::Bajo => text.green(),
        Severity::Medio => text.yellow(),
        Severity::Alto => text.bright_red(),
        Severity::Critico => text.red().bold(),
    }
}

fn print_comment(record: &CommentRecord, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }
    let verdict = if record.is_toxic {
        "TÓXICO".red().bold()
    } else {
        "LIMPIO".green().bold()
    };
    println!(
        "{verdict}  confianza {:.1}%",
        record.toxicity_confidence * 100.0
    );
    for key in &record.categories_detected {
        let category = resolve(key);
        println!(
            "  - {} [{}]",
            category.friendly,
            severity_label(category.severity)
        );
    }
    Ok(())
}

fn print_result(result: &AnalysisResult, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let digest = aggregate(result);

    if json {
        let body = serde_json::json!({ "analysis": result, "digest": digest });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("{}", "Resumen del análisis".bold());
    println!(
        "  comentarios: {} ({} tóxicos, {:.1}%)",
        result.total_comments,
        result.toxic_comments,
        result.main_comments_toxicity_rate * 100.0
    );
    println!(
        "  respuestas:  {} ({} tóxicas, {:.1}%)",
        result.total_replies,
        result.toxic_replies,
        result.replies_toxicity_rate * 100.0
    );
    println!(
        "  total:       {} ({} tóxicos, {:.1}%)",
        result.total_analyzed,
        result.total_toxic,
        result.toxicity_rate * 100.0
    );

    if !result.summary.categories_found.is_empty() {
        println!("\n{}", "Categorías encontradas".bold());
        for (name, count) in &result.summary.categories_found {
            let category = resolve(name);
            println!(
                "  {} [{}]: {}",
                category.friendly,
                severity_label(category.severity),
                count
            );
        }
    }

    if let Some(worst) = &result.summary.most_toxic_comment {
        println!("\n{}", "Comentario más tóxico".bold());
        println!(
            "  \"{}\" ({:.1}%)",
            worst.text,
            worst.toxicity_confidence * 100.0
        );
    }

    if digest.items.is_empty() {
        println!("\n{}", "Sin contenido tóxico detectado.".green());
        return Ok(());
    }

    println!(
        "\n{} ({} main, {} reply, {} de alta toxicidad, media {:.1}%)",
        "Elementos tóxicos".bold(),
        digest.main_toxic_count,
        digest.reply_toxic_count,
        digest.high_toxicity_count,
        digest.average_confidence * 100.0
    );
    for item in digest.items.iter().take(10) {
        let origin = format!("[{}]", item.origin);
        println!(
            "  {:>6.1}% {} {}",
            item.record.toxicity_confidence * 100.0,
            origin.cyan(),
            item.record.text
        );
    }
    Ok(())
}

fn print_history(entries: &[HistoryEntry], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }
    let stats = HistoryStats::from_entries(entries);
    println!(
        "{}: {} videos, {} comentarios, toxicidad media {:.2}%, {} seguros",
        "Historial".bold(),
        stats.total_videos,
        stats.total_comments,
        stats.average_toxicity,
        stats.safe_videos
    );
    for entry in entries {
        println!(
            "  {:>6.1}%  {}  {}",
            entry.toxicity_rate,
            entry.date.as_deref().unwrap_or("-"),
            entry.video_title
        );
        for category in &entry.categories {
            println!(
                "          {} [{}]",
                category.friendly,
                severity_label(category.severity)
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = ClientConfig::new(resolve_base_url(args.base_url.as_deref()));
    let client = ToxiClient::new(config.clone())?;

    if args.health {
        let health = client.health().await?;
        println!("status: {}", health.status);
        if let Some(version) = health.pipeline_version {
            println!("pipeline: {version}");
        }
        return Ok(());
    }

    if args.history {
        let rows = client.fetch_history().await?;
        let entries: Vec<HistoryEntry> = rows.iter().map(HistoryEntry::from_row).collect();
        return print_history(&entries, args.json);
    }

    let target = args
        .target
        .clone()
        .ok_or("missing target: pass a video URL, or comment text with --comment")?;

    if args.comment {
        let record = client.analyze_comment(&target).await?;
        return print_comment(&record, args.json);
    }

    // Video mode: launch the job, then follow its progress channel until the
    // single terminal event arrives.
    let request = AnalysisRequest {
        url: target,
        max_comments: clamp_max_comments(args.max_comments),
    };
    let session = client.start_analysis(&request).await?;
    eprintln!(
        "{} sesión {} iniciada ({} comentarios máx.)",
        "[toxilens]".cyan(),
        session.session_id,
        request.max_comments
    );

    let (tx, mut rx) = mpsc::unbounded_channel::<Result<AnalysisResult, String>>();
    let done_tx = tx.clone();
    let fail_tx = tx;

    let mut handle = session::attach(
        &config,
        &session.session_id,
        |percentage, message| {
            print!("\r  {percentage:>5.1}%  {message}{}", " ".repeat(8));
            let _ = io::stdout().flush();
        },
        move |result| {
            let _ = done_tx.send(Ok(result));
        },
        move |reason| {
            let _ = fail_tx.send(Err(reason));
        },
    );

    let outcome = rx
        .recv()
        .await
        .ok_or("progress channel dropped without a terminal event")?;
    handle.detach();
    println!();

    match outcome {
        Ok(result) => print_result(&result, args.json),
        Err(reason) => {
            eprintln!("{} {reason}", "error:".red().bold());
            std::process::exit(1);
        }
    }
}
