mod remote;
mod render;

use bubbles::drag::{CanvasRect, Point, PointerId};
use bubbles::host::{HostView, LoadState};
use bubbles::live::LiveListener;
use bubbles::remote::{RemoteError, RemoteStore};
use bubbles::retry::RetryPolicy;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::{info, warn};

use crate::remote::HttpStore;
use crate::render::{format_bubble, format_load_state};

/// Pointer id used for scripted drags.
const SCRIPTED_POINTER: PointerId = 1;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("comment {comment_id} is not on photo {photo_id}")]
    UnknownComment { photo_id: String, comment_id: String },
    #[error("position for {0} was not saved; see log for details")]
    PositionNotSaved(String),
    #[error("live feed for {0} ended")]
    FeedEnded(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "exhibit-cli", about = "Exhibit comment wall API and host CLI")]
struct Cli {
    #[arg(long, env = "EXHIBIT_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is up.
    Ping,
    /// List the photos on display.
    Photos,
    Comment(CommentCommand),
    Host(HostCommand),
}

#[derive(Args, Debug)]
struct CommentCommand {
    #[command(subcommand)]
    command: CommentSubcommand,
}

#[derive(Subcommand, Debug)]
enum CommentSubcommand {
    /// Leave a comment on a photo, as a guest would.
    Post { photo_id: String, text: String },
    /// Print every comment on a photo, newest first.
    List { photo_id: String },
}

#[derive(Args, Debug)]
struct HostCommand {
    #[command(subcommand)]
    command: HostSubcommand,
}

#[derive(Subcommand, Debug)]
enum HostSubcommand {
    /// Show a photo's bubbles and follow new comments until interrupted.
    Watch {
        photo_id: String,
        /// Print the current bubbles and exit.
        #[arg(long, default_value_t = false)]
        once: bool,
    },
    /// Drag a bubble to a new position (percent of the canvas) and save it.
    Move {
        photo_id: String,
        comment_id: String,
        #[arg(long, allow_hyphen_values = true)]
        top: f64,
        #[arg(long, allow_hyphen_values = true)]
        left: f64,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let store = HttpStore::new(&cli.base_url)?;
    let policy = RetryPolicy::from_env();

    match cli.command {
        Command::Ping => run_ping(&store).await,
        Command::Photos => run_photos(&store).await,
        Command::Comment(comment) => run_comment(&store, comment).await,
        Command::Host(host) => run_host(&store, policy, host).await,
    }
}

async fn run_ping(store: &HttpStore) -> Result<(), CliError> {
    store.health().await?;
    println!("ok");
    Ok(())
}

async fn run_photos(store: &HttpStore) -> Result<(), CliError> {
    let photos: Value = store.get_json(&["api", "photos"]).await?;
    print_json(&photos)
}

async fn run_comment(store: &HttpStore, comment: CommentCommand) -> Result<(), CliError> {
    match comment.command {
        CommentSubcommand::Post { photo_id, text } => {
            let created = store.insert_comment(&photo_id, &text).await?;
            print_json(&serde_json::to_value(&created)?)
        }
        CommentSubcommand::List { photo_id } => {
            let comments = store.list_comments(&photo_id).await?;
            print_json(&serde_json::to_value(&comments)?)
        }
    }
}

async fn run_host(store: &HttpStore, policy: RetryPolicy, host: HostCommand) -> Result<(), CliError> {
    match host.command {
        HostSubcommand::Watch { photo_id, once } => host_watch(store, policy, &photo_id, once).await,
        HostSubcommand::Move { photo_id, comment_id, top, left } => {
            host_move(store, policy, &photo_id, &comment_id, top, left).await
        }
    }
}

async fn open_view(store: &dyn RemoteStore, policy: RetryPolicy, photo_id: &str) -> HostView {
    let mut view = HostView::new(policy);
    view.switch_photo(photo_id);
    view.load(store).await;
    view
}

fn print_view(view: &HostView, photo_id: &str) {
    let bubbles = view.bubbles();
    println!("{}", format_load_state(photo_id, view.load_state(), bubbles.len()));
    for bubble in &bubbles {
        println!("{}", format_bubble(bubble));
    }
}

async fn host_watch(store: &HttpStore, policy: RetryPolicy, photo_id: &str, once: bool) -> Result<(), CliError> {
    if once {
        let view = open_view(store, policy, photo_id).await;
        print_view(&view, photo_id);
        return Ok(());
    }

    // Subscribe before fetching; `apply_insert` drops comments seen in both.
    let mut live = LiveListener::new(policy);
    live.listen(store, photo_id).await?;
    let mut view = open_view(store, policy, photo_id).await;
    print_view(&view, photo_id);
    eprintln!("watching {photo_id}; press Ctrl-C to stop");

    loop {
        tokio::select! {
            comment = live.next() => {
                let Some(comment) = comment else {
                    warn!(%photo_id, "live feed ended; reconnecting");
                    live.listen(store, photo_id)
                        .await
                        .map_err(|_| CliError::FeedEnded(photo_id.to_owned()))?;
                    // Recover comments inserted while disconnected.
                    view.load(store).await;
                    continue;
                };
                let comment_id = comment.id.clone();
                if view.apply_insert(comment) {
                    if let Some(bubble) = view.bubbles().iter().find(|b| b.comment_id == comment_id) {
                        println!("+ {}", format_bubble(bubble));
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    live.close();
    Ok(())
}

async fn host_move(
    store: &HttpStore,
    policy: RetryPolicy,
    photo_id: &str,
    comment_id: &str,
    top: f64,
    left: f64,
) -> Result<(), CliError> {
    let mut view = open_view(store, policy, photo_id).await;
    if let LoadState::Failed(reason) = view.load_state() {
        return Err(CliError::Remote(RemoteError::Unavailable(reason.clone())));
    }
    let Some(start) = view.positions().position(comment_id) else {
        return Err(CliError::UnknownComment { photo_id: photo_id.to_owned(), comment_id: comment_id.to_owned() });
    };

    // A 100x100 canvas at the origin makes one pixel one percent.
    let canvas = CanvasRect::new(0.0, 0.0, 100.0, 100.0);
    view.pointer_down(comment_id, SCRIPTED_POINTER, Point::new(start.left, start.top), canvas);
    view.pointer_move(comment_id, SCRIPTED_POINTER, Point::new(left, top), canvas);
    let actions = view.pointer_up(comment_id, SCRIPTED_POINTER);

    if view.persist(store, &actions).await == 0 {
        return Err(CliError::PositionNotSaved(comment_id.to_owned()));
    }

    if let Some(bubble) = view.bubbles().iter().find(|b| b.comment_id == comment_id) {
        info!(%comment_id, top = bubble.position.top, left = bubble.position.left, "bubble moved");
        println!("{}", format_bubble(bubble));
    }
    Ok(())
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
