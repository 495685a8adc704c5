//! Command implementations

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::args::{InputArgs, ListArgs, LocateArgs, SearchArgs, StreamArgs, SummaryArgs};
use crate::cli::Commands;
use crate::config_initialization::ProbeConfig;
use crate::domain::model::{Addressing, MediaRecord, TrackType};
use crate::probe::{
    ChannelLocator, ExtractDirective, MediaAttributes, ReportLoader, SequencePolicy, TrackIndex,
};

/// Printed when a queried value is absent
const ABSENT: &str = "none";

/// A loader plus the query settings every command shares
pub struct Session {
    loader: ReportLoader,
    policy: SequencePolicy,
}

impl Session {
    pub fn new(loader: ReportLoader, policy: SequencePolicy) -> Self {
        Self { loader, policy }
    }

    pub fn from_config(config: ProbeConfig) -> Self {
        let policy = config.sequence_policy;
        Self::new(ReportLoader::from_config(config), policy)
    }

    async fn load(&self, path: &Path) -> Result<MediaRecord> {
        Ok(self.loader.load(path).await?)
    }

    fn index<'a>(&self, record: &'a MediaRecord) -> TrackIndex<'a> {
        TrackIndex::new(record).with_sequence_policy(self.policy)
    }
}

/// Dispatch a parsed command
pub async fn execute(session: &Session, command: Commands, out: &mut dyn Write) -> Result<()> {
    match command {
        Commands::All(args) => all(session, &args, out).await,
        Commands::Raw(args) => raw(session, &args, out).await,
        Commands::Fps(args) => scalar(session, &args, out, |index| index.frame_rate()).await,
        Commands::Frames(args) => scalar(session, &args, out, |index| index.frame_count()).await,
        Commands::Duration(args) => scalar(session, &args, out, |index| index.duration()).await,
        Commands::Timecode(args) => {
            scalar(session, &args, out, |index| index.start_timecode()).await
        }
        Commands::Colorspace(args) => {
            scalar(session, &args, out, |index| index.color_space()).await
        }
        Commands::Resolution(args) => {
            scalar(session, &args, out, |index| {
                index.resolution().map(|r| r.to_string())
            })
            .await
        }
        Commands::Streams(args) => streams(session, &args, out).await,
        Commands::Video(args) => video(session, &args, out).await,
        Commands::Audio(args) => audio(session, &args, out).await,
        Commands::Search(args) => search(session, &args, out).await,
        Commands::Locate(args) => locate(session, &args, out).await,
        Commands::Summary(args) => summary(session, &args, out).await,
    }
}

/// Label each block with its path when more than one file is probed
fn header(out: &mut dyn Write, args: &InputArgs, record: &MediaRecord) -> Result<()> {
    if args.inputs.len() > 1 {
        writeln!(out, "{}", record.path)?;
    }
    Ok(())
}

fn shown(value: Option<String>) -> String {
    value.unwrap_or_else(|| ABSENT.to_string())
}

/// Execute the all command
pub async fn all(session: &Session, args: &ListArgs, out: &mut dyn Write) -> Result<()> {
    for input in &args.input.inputs {
        let record = session.load(input).await?;
        if args.json {
            let json = serde_json::to_string_pretty(&record)
                .context("Failed to serialize media record to JSON")?;
            writeln!(out, "{}", json)?;
        } else {
            write!(out, "{}", record.render_listing())?;
        }
    }
    Ok(())
}

/// Execute the raw command
pub async fn raw(session: &Session, args: &InputArgs, out: &mut dyn Write) -> Result<()> {
    for input in &args.inputs {
        let bytes = session.loader.load_raw(input).await?;
        out.write_all(&bytes)?;
    }
    Ok(())
}

/// One text value per input
async fn scalar<F>(session: &Session, args: &InputArgs, out: &mut dyn Write, query: F) -> Result<()>
where
    F: Fn(&TrackIndex<'_>) -> Option<String>,
{
    for input in &args.inputs {
        let record = session.load(input).await?;
        header(out, args, &record)?;
        writeln!(out, "{}", shown(query(&session.index(&record))))?;
    }
    Ok(())
}

/// Execute the streams command
pub async fn streams(session: &Session, args: &InputArgs, out: &mut dyn Write) -> Result<()> {
    for input in &args.inputs {
        let record = session.load(input).await?;
        header(out, args, &record)?;
        let types = session.index(&record).stream_types()?;
        writeln!(out, "{}", types.join(", "))?;
    }
    Ok(())
}

/// Execute the video command
pub async fn video(session: &Session, args: &StreamArgs, out: &mut dyn Write) -> Result<()> {
    let addressing = Addressing::from_pid_flag(args.pid);
    for input in &args.input.inputs {
        let record = session.load(input).await?;
        header(out, &args.input, &record)?;
        let index = session.index(&record);
        let addresses = index.video_streams(addressing)?;
        writeln!(out, "video_count = {}", index.video_count())?;
        for address in addresses {
            writeln!(out, "stream {}", address)?;
        }
    }
    Ok(())
}

/// Execute the audio command
pub async fn audio(session: &Session, args: &StreamArgs, out: &mut dyn Write) -> Result<()> {
    let addressing = Addressing::from_pid_flag(args.pid);
    for input in &args.input.inputs {
        let record = session.load(input).await?;
        header(out, &args.input, &record)?;
        let index = session.index(&record);
        let streams = index.audio_streams(addressing)?;
        writeln!(out, "audio_count = {}", index.audio_count()?)?;
        for stream in streams {
            writeln!(out, "stream {}: {} channel(s)", stream.address, stream.channels)?;
        }
    }
    Ok(())
}

/// Execute the search command
pub async fn search(session: &Session, args: &SearchArgs, out: &mut dyn Write) -> Result<()> {
    let track_type: TrackType = args.track_type.parse()?;
    for input in &args.input.inputs {
        let record = session.load(input).await?;
        header(out, &args.input, &record)?;
        let value = session.index(&record).search(&args.field, track_type);
        writeln!(out, "{}", shown(value))?;
    }
    Ok(())
}

/// Execute the locate command
pub async fn locate(session: &Session, args: &LocateArgs, out: &mut dyn Write) -> Result<()> {
    let addressing = Addressing::from_pid_flag(args.pid);
    for input in &args.input.inputs {
        let record = session.load(input).await?;
        header(out, &args.input, &record)?;
        let locator = ChannelLocator::from_index(&session.index(&record), addressing)?;
        let location = locator.locate(args.channel)?;
        info!(
            channel = args.channel,
            stream = location.address,
            offset = location.offset,
            "Located audio channel"
        );

        if args.ffmpeg {
            writeln!(out, "{}", ExtractDirective::for_location(&location)?)?;
        } else {
            writeln!(out, "{}", location.address)?;
        }
    }
    Ok(())
}

/// Execute the summary command
pub async fn summary(session: &Session, args: &SummaryArgs, out: &mut dyn Write) -> Result<()> {
    for (n, input) in args.input.inputs.iter().enumerate() {
        let record = session.load(input).await?;
        let index = session.index(&record);
        let attributes = if args.lenient {
            MediaAttributes::collect(&index)?
        } else {
            MediaAttributes::collect_strict(&index)?
        };

        if args.json {
            let json = serde_json::to_string_pretty(&attributes)
                .context("Failed to serialize attributes to JSON")?;
            writeln!(out, "{}", json)?;
        } else {
            if n > 0 {
                writeln!(out)?;
            }
            display_attributes(out, &attributes)?;
        }
    }
    Ok(())
}

fn display_attributes(out: &mut dyn Write, attributes: &MediaAttributes) -> Result<()> {
    let join = |items: Vec<String>| items.join(", ");

    writeln!(out, "path = {}", attributes.path)?;
    writeln!(out, "stream_count = {}", attributes.stream_count)?;
    writeln!(out, "stream_types = {}", attributes.stream_types.join(", "))?;
    writeln!(out, "video_count = {}", attributes.video_count)?;
    writeln!(
        out,
        "video_streams = {}",
        join(attributes.video_streams.iter().map(u32::to_string).collect())
    )?;
    writeln!(out, "audio_count = {}", attributes.audio_count)?;
    writeln!(
        out,
        "audio_streams = {}",
        join(
            attributes
                .audio_streams
                .iter()
                .map(|s| format!("{}:{}", s.address, s.channels))
                .collect()
        )
    )?;
    writeln!(out, "fps = {}", shown(attributes.fps.map(|f| f.to_string())))?;
    writeln!(
        out,
        "resolution = {}",
        shown(attributes.resolution.as_ref().map(|r| r.to_string()))
    )?;
    writeln!(
        out,
        "frame_count = {}",
        shown(attributes.frame_count.map(|f| f.to_string()))
    )?;
    writeln!(
        out,
        "start_timecode = {}",
        shown(attributes.start_timecode.clone())
    )?;
    Ok(())
}
