// Subcommand implementations: load the file, run the library, save or print.

use anyhow::{Context, Result};
use avi_steg::headers::AviStreamHeader;
use avi_steg::{build_index, compute_capacity, riff, Category, ChunkIndex, Decoder, Encoder};
use std::fs;
use std::path::Path;

use super::output::Status;
use crate::{MessageSource, StreamKind, StreamSelection};

/// Expands the user-facing stream kinds into codec categories, keeping order.
pub fn categories(streams: &[StreamKind]) -> Vec<Category> {
    streams
        .iter()
        .flat_map(|kind| match kind {
            StreamKind::Junk => vec![Category::Junk],
            StreamKind::Video => vec![Category::VideoUncompressed, Category::VideoCompressed],
            StreamKind::Audio => vec![Category::Audio],
        })
        .collect()
}

pub fn info(file: &Path, status: &Status) -> Result<()> {
    let avi = load(file, status)?;
    let index = parse(&avi)?;

    if let Some(size) = riff::riff_size(&avi) {
        println!("RIFF size: {} B", size);
    }

    let main = &index.main_header;
    println!(
        "Main header: {}x{}, {:.2} fps, {} frames, {} streams",
        main.width,
        main.height,
        main.frame_rate(),
        main.total_frames,
        main.streams
    );

    println!("Video stream: {}", describe_stream(&index.streams.video.header));
    if let Some(bitmap) = &index.streams.video.bitmap_info {
        println!(
            "  bitmap: {}x{}, {} bpp, compression '{}'",
            bitmap.width, bitmap.height, bitmap.bit_count, bitmap.compression
        );
    }
    println!("Audio stream: {}", describe_stream(&index.streams.audio.header));

    let capacity = compute_capacity(&index, &Category::ALL);
    println!("Available space:");
    for (category, bytes) in capacity.per_category.iter() {
        println!(
            "  {}: {} chunks, {} B{}",
            category,
            index.chunks(*category).len(),
            bytes,
            if index.is_compressed(*category) {
                " (compressed, needs --force)"
            } else {
                ""
            }
        );
    }

    Ok(())
}

pub fn hide(
    file: &Path,
    source: &MessageSource,
    output: Option<&Path>,
    selection: &StreamSelection,
    status: &Status,
) -> Result<()> {
    let message = match (&source.message, &source.message_file) {
        (Some(message), _) => message.clone(),
        (None, Some(path)) => {
            let message = fs::read_to_string(path)
                .with_context(|| format!("loading message from {}", path.display()))?;
            status.ok(&format!("{} loading.", path.display()));
            message
        }
        (None, None) => anyhow::bail!("no message given"),
    };

    let mut avi = load(file, status)?;
    let index = parse(&avi)?;
    let categories = categories(&selection.streams);

    report_capacity(&index, &categories, status);

    let report = Encoder::new(selection.force)
        .hide(&mut avi, &index, &message, &categories)
        .context("hiding message")?;

    for category in report.skipped.iter() {
        status.warning(&skipped_warning(*category));
    }
    status.ok(&format!(
        "Message hidden: {} B in {} chunks.",
        report.bytes_embedded, report.chunks_used
    ));

    let target = output.unwrap_or(file);
    fs::write(target, &avi).with_context(|| format!("saving data to {}", target.display()))?;
    status.ok(&format!("Saving data to {}.", target.display()));

    Ok(())
}

pub fn extract(
    file: &Path,
    output: Option<&Path>,
    selection: &StreamSelection,
    status: &Status,
) -> Result<()> {
    let avi = load(file, status)?;
    let index = parse(&avi)?;
    let categories = categories(&selection.streams);

    let message = Decoder::new(selection.force)
        .extract(&avi, &index, &categories)
        .context("extracting message")?;
    status.ok(&format!("Message extracted: {} characters.", message.chars().count()));

    match output {
        Some(path) => {
            fs::write(path, &message)
                .with_context(|| format!("saving message to {}", path.display()))?;
            status.ok(&format!("Saving message to {}.", path.display()));
        }
        None => println!("{}", message),
    }

    Ok(())
}

fn load(path: &Path, status: &Status) -> Result<Vec<u8>> {
    let avi = fs::read(path).with_context(|| format!("loading {}", path.display()))?;
    status.ok(&format!("{} loading.", path.display()));
    Ok(avi)
}

fn parse(avi: &[u8]) -> Result<ChunkIndex> {
    build_index(avi).context("reading AVI structure")
}

fn report_capacity(index: &ChunkIndex, categories: &[Category], status: &Status) {
    let capacity = compute_capacity(index, categories);
    for (category, bytes) in capacity.per_category.iter() {
        status.info(&format!("Available free {} space: {}B", category, bytes));
    }
}

fn skipped_warning(category: Category) -> String {
    let stream = match category {
        Category::Junk => "junk",
        Category::VideoCompressed | Category::VideoUncompressed => "video",
        Category::Audio => "audio",
    };
    format!(
        "Writing to compressed {} stream is not allowed. See --force flag to enable it.",
        stream
    )
}

fn describe_stream(header: &AviStreamHeader) -> String {
    format!(
        "handler '{}', {:.2}/s, quality {} ({})",
        header.fcc_handler,
        header.frame_rate(),
        header.quality,
        if header.is_uncompressed() {
            "uncompressed"
        } else {
            "compressed"
        }
    )
}
