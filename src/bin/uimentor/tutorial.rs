//! Interactive tutorial loop

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};

use uimentor::tutorial::code_blocks;
use uimentor::{
    CredentialStore, ImageAttachment, Mentor, MentorConfig, MentorResult, OpenAiClient,
    TutorialStep,
};

const HELP: &str = "[n]ext  [p]revious  [c <k>] print code block k  [q]uit";

pub async fn run(
    config: &MentorConfig,
    store: Arc<dyn CredentialStore>,
    description: &str,
    image_paths: &[PathBuf],
) -> Result<()> {
    if store.load()?.is_none() {
        anyhow::bail!("No API key. Run `uimentor key set <KEY>` or pass --api-key.");
    }

    let mut images = Vec::with_capacity(image_paths.len());
    for path in image_paths {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        images.push(ImageAttachment::new(bytes));
    }

    let client = OpenAiClient::new(config)?;
    let mut mentor = Mentor::new(client, store, config);

    let first = with_spinner("Preparing your tutorial...", mentor.start(description, &images))
        .await
        .context("Failed to start the tutorial")?;
    let Some(first) = first else {
        anyhow::bail!("No API key available.");
    };
    show(&first);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!("\n{}", HELP);
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let mut words = line.split_whitespace();
        match words.next() {
            Some("n") | Some("next") => {
                let result = if mentor.session().at_last_step() {
                    with_spinner("Fetching the next step...", mentor.advance()).await
                } else {
                    mentor.advance().await
                };
                match result {
                    Ok(Some(step)) => show(&step),
                    Ok(None) => println!("No API key available."),
                    Err(err) => eprintln!("Request failed: {}. Try [n]ext again.", err),
                }
            }
            Some("p") | Some("prev") => match mentor.retreat() {
                Some(step) => show(&step),
                None => println!("Nothing to show yet."),
            },
            Some("c") | Some("code") => {
                let Some(step) = mentor.session().current_step() else {
                    continue;
                };
                let blocks = code_blocks(&step.content);
                let index = words
                    .next()
                    .and_then(|k| k.parse::<usize>().ok())
                    .unwrap_or(1);
                match index.checked_sub(1).and_then(|i| blocks.get(i)) {
                    Some(block) => println!("{}", block.code),
                    None => log::warn!(
                        "Step {} has {} code block(s); no block {}",
                        step.step,
                        blocks.len(),
                        index
                    ),
                }
            }
            Some("q") | Some("quit") => break,
            Some(other) => println!("Unknown command '{}'", other),
            None => {}
        }
    }

    println!(
        "Finished after {} step(s).",
        mentor.session().steps().len()
    );
    Ok(())
}

async fn with_spinner<T>(
    message: &'static str,
    fut: impl Future<Output = MentorResult<T>>,
) -> MentorResult<T> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = fut.await;
    spinner.finish_and_clear();
    result
}

fn show(step: &TutorialStep) {
    println!("\n======== Step {} ========\n", step.step);
    println!("{}", step.content);
    let blocks = code_blocks(&step.content);
    if !blocks.is_empty() {
        let langs: Vec<&str> = blocks
            .iter()
            .map(|b| b.language.as_deref().unwrap_or("text"))
            .collect();
        println!("\n({} code block(s): {})", blocks.len(), langs.join(", "));
    }
}
