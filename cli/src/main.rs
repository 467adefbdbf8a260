mod session;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::time::Duration;

use canvas::ids::{board_from_link, board_link, new_board_code};
use canvas::reconciler::Origin;
use canvas::surface::{Scene, Surface};
use clap::{Args, Parser, Subcommand, ValueEnum};
use frames::{DrawableObject, Encoding, ObjectPatch, PartialTransform, ServerEvent, ShapeKind, Transform};
use serde_json::Value;

use crate::session::{REPLY_TIMEOUT, Session};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("no board code in {0:?}")]
    MissingBoard(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket error: {0}")]
    Ws(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket closed")]
    WsClosed,
    #[error("event decode failed: {0}")]
    Codec(#[from] frames::CodecError),
    #[error("timed out waiting for the server")]
    Timeout,
    #[error("object {0} is not on the board")]
    UnknownObject(String),
    #[error("invalid point {0:?}; expected x,y")]
    InvalidPoint(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("input error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "sketchboard", about = "Headless participant for a shared sketchboard")]
struct Cli {
    #[arg(long, env = "SKETCHBOARD_URL", default_value = "http://127.0.0.1:3001")]
    url: String,

    /// Speak the protobuf envelope instead of JSON text.
    #[arg(long, default_value_t = false)]
    binary: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the server health endpoint.
    Ping,
    /// Generate a new board code and its share link.
    New {
        #[arg(long, default_value = "http://localhost:5173/")]
        base: String,
    },
    /// Print a board's current contents as JSON.
    Snapshot { board: String },
    /// Join a board and print every change as it arrives.
    Watch {
        board: String,
        /// Stop after this many seconds instead of waiting for Ctrl-C.
        #[arg(long)]
        seconds: Option<u64>,
    },
    /// Add a text node.
    Text(TextArgs),
    /// Add a freehand stroke.
    Stroke(StrokeArgs),
    /// Add a primitive shape.
    Shape(ShapeArgs),
    /// Move, scale, or rotate an existing object.
    Move(MoveArgs),
    /// Remove an object by id.
    Erase { board: String, object_id: String },
    /// Clear the board for everyone.
    Clear { board: String },
    /// Stream drawable objects from JSONL (one object per line).
    Feed {
        board: String,
        #[arg(long, default_value = "-", help = "Input file path, or - for stdin")]
        input: String,
    },
}

#[derive(Args, Debug)]
struct Placement {
    #[arg(long, default_value_t = canvas::consts::INSERT_LEFT)]
    left: f64,
    #[arg(long, default_value_t = canvas::consts::INSERT_TOP)]
    top: f64,
}

#[derive(Args, Debug)]
struct TextArgs {
    board: String,
    content: String,
    #[command(flatten)]
    at: Placement,
    #[arg(long)]
    font_size: Option<f64>,
}

#[derive(Args, Debug)]
struct StrokeArgs {
    board: String,
    /// Space-separated `x,y` pairs in stroke-local coordinates.
    #[arg(long, num_args = 1.., value_delimiter = ' ')]
    points: Vec<String>,
    #[command(flatten)]
    at: Placement,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShapeArg {
    Rect,
    Ellipse,
    Triangle,
    Line,
}

impl From<ShapeArg> for ShapeKind {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Rect => Self::Rect,
            ShapeArg::Ellipse => Self::Ellipse,
            ShapeArg::Triangle => Self::Triangle,
            ShapeArg::Line => Self::Line,
        }
    }
}

#[derive(Args, Debug)]
struct ShapeArgs {
    board: String,
    #[arg(value_enum)]
    shape: ShapeArg,
    #[arg(long, default_value_t = 100.0)]
    width: f64,
    #[arg(long, default_value_t = 100.0)]
    height: f64,
    #[command(flatten)]
    at: Placement,
}

#[derive(Args, Debug)]
struct MoveArgs {
    board: String,
    object_id: String,
    #[arg(long)]
    left: Option<f64>,
    #[arg(long)]
    top: Option<f64>,
    #[arg(long)]
    scale: Option<f64>,
    #[arg(long)]
    angle: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let encoding = if cli.binary { Encoding::Protobuf } else { Encoding::Json };

    match cli.command {
        Command::Ping => run_ping(&cli.url).await,
        Command::New { base } => {
            let code = new_board_code();
            println!("{code}");
            println!("{}", board_link(&base, &code));
            Ok(())
        }
        Command::Snapshot { board } => run_snapshot(&cli.url, &resolve_board(&board)?).await,
        Command::Watch { board, seconds } => {
            run_watch(&cli.url, encoding, &resolve_board(&board)?, seconds.map(Duration::from_secs)).await
        }
        Command::Text(args) => {
            let mut object = DrawableObject::text("", args.content, Transform::at(args.at.left, args.at.top));
            if let (Some(size), frames::ObjectBody::TextNode(text)) = (args.font_size, &mut object.body) {
                text.font_size = size;
            }
            run_draw(&cli.url, encoding, &resolve_board(&args.board)?, vec![object]).await
        }
        Command::Stroke(args) => {
            let points = parse_points(&args.points)?;
            let object = DrawableObject::path("", points, Transform::at(args.at.left, args.at.top));
            run_draw(&cli.url, encoding, &resolve_board(&args.board)?, vec![object]).await
        }
        Command::Shape(args) => {
            let transform = Transform::at(args.at.left, args.at.top);
            let object = DrawableObject::shape("", args.shape.into(), args.width, args.height, transform);
            run_draw(&cli.url, encoding, &resolve_board(&args.board)?, vec![object]).await
        }
        Command::Move(args) => run_move(&cli.url, encoding, args).await,
        Command::Erase { board, object_id } => {
            run_erase(&cli.url, encoding, &resolve_board(&board)?, &object_id).await
        }
        Command::Clear { board } => run_clear(&cli.url, encoding, &resolve_board(&board)?).await,
        Command::Feed { board, input } => {
            let objects = read_objects(&input)?;
            run_draw(&cli.url, encoding, &resolve_board(&board)?, objects).await
        }
    }
}

// =============================================================================
// HTTP
// =============================================================================

async fn run_ping(base_url: &str) -> Result<(), CliError> {
    let url = format!("{}/healthz", base_url.trim_end_matches('/'));
    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError {
            status: status.as_u16(),
            message: "health check failed".to_owned(),
        });
    }
    println!("ok");
    Ok(())
}

async fn run_snapshot(base_url: &str, board_id: &str) -> Result<(), CliError> {
    let url = format!("{}/api/boards/{board_id}", base_url.trim_end_matches('/'));
    let response = reqwest::get(url).await?;
    let status = response.status();
    let value = response.json::<Value>().await.unwrap_or(Value::Null);
    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: value.to_string() });
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

// =============================================================================
// WEBSOCKET
// =============================================================================

async fn open(base_url: &str, encoding: Encoding, board_id: &str) -> Result<Session, CliError> {
    let mut session = Session::connect(&ws_url(base_url)?, encoding).await?;
    session.join(board_id).await?;
    Ok(session)
}

async fn run_watch(
    base_url: &str,
    encoding: Encoding,
    board_id: &str,
    limit: Option<Duration>,
) -> Result<(), CliError> {
    let mut session = open(base_url, encoding, board_id).await?;
    eprintln!("watching {board_id}");
    print_board(session.board().surface());

    let deadline = limit.map(|d| tokio::time::Instant::now() + d);
    loop {
        let sleep = async {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            event = session.next_event() => println!("{}", describe(&event?)),
            _ = tokio::signal::ctrl_c() => break,
            () = sleep => break,
        }
    }

    print_board(session.board().surface());
    session.close().await
}

async fn run_draw(
    base_url: &str,
    encoding: Encoding,
    board_id: &str,
    objects: Vec<DrawableObject>,
) -> Result<(), CliError> {
    let mut session = open(base_url, encoding, board_id).await?;
    let mut sent = 0_usize;
    let mut skipped = 0_usize;

    for object in objects {
        let request = session.board_mut().add_object(object, Origin::Local);
        let Some(frames::ClientEvent::DrawObject { object, .. }) = &request else {
            skipped = skipped.saturating_add(1);
            continue;
        };
        println!("{}", object.id);
        session.send_opt(request).await?;
        sent = sent.saturating_add(1);
    }

    eprintln!("draw complete: board_id={board_id} sent={sent} skipped={skipped}");
    session.close().await
}

async fn run_move(base_url: &str, encoding: Encoding, args: MoveArgs) -> Result<(), CliError> {
    let board_id = resolve_board(&args.board)?;
    let mut session = open(base_url, encoding, &board_id).await?;

    let transform = PartialTransform {
        left: args.left,
        top: args.top,
        scale_x: args.scale,
        scale_y: args.scale,
        angle: args.angle,
    };
    let patch = ObjectPatch::transform(args.object_id.clone(), transform);
    let request = session.board_mut().update_object(&patch, Origin::Local);
    if !session.send_opt(request).await? {
        return Err(CliError::UnknownObject(args.object_id));
    }
    session.close().await
}

async fn run_erase(
    base_url: &str,
    encoding: Encoding,
    board_id: &str,
    object_id: &str,
) -> Result<(), CliError> {
    let mut session = open(base_url, encoding, board_id).await?;
    let request = session.board_mut().remove_object(object_id, Origin::Local);
    if !session.send_opt(request).await? {
        return Err(CliError::UnknownObject(object_id.to_owned()));
    }
    session.close().await
}

async fn run_clear(base_url: &str, encoding: Encoding, board_id: &str) -> Result<(), CliError> {
    let mut session = open(base_url, encoding, board_id).await?;
    let request = session.board().request_clear();
    session.send_opt(request).await?;
    // The local board empties only when the server's echo arrives.
    session.wait_for(|event| *event == ServerEvent::BoardCleared, REPLY_TIMEOUT).await?;
    println!("cleared {board_id}");
    session.close().await
}

// =============================================================================
// HELPERS
// =============================================================================

fn ws_url(base_url: &str) -> Result<String, CliError> {
    let base = base_url.trim_end_matches('/');
    if let Some(rest) = base.strip_prefix("http://") {
        return Ok(format!("ws://{rest}/ws"));
    }
    if let Some(rest) = base.strip_prefix("https://") {
        return Ok(format!("wss://{rest}/ws"));
    }
    if base.starts_with("ws://") || base.starts_with("wss://") {
        return Ok(format!("{base}/ws"));
    }

    Err(CliError::InvalidBaseUrl(base_url.to_owned()))
}

/// Accept either a bare board code or a share link carrying one.
fn resolve_board(arg: &str) -> Result<String, CliError> {
    if arg.contains("://") || arg.contains('?') {
        return board_from_link(arg).ok_or_else(|| CliError::MissingBoard(arg.to_owned()));
    }
    let code = arg.trim();
    if code.is_empty() {
        return Err(CliError::MissingBoard(arg.to_owned()));
    }
    Ok(code.to_owned())
}

fn parse_points(raw: &[String]) -> Result<Vec<[f64; 2]>, CliError> {
    raw.iter()
        .filter(|p| !p.trim().is_empty())
        .map(|pair| {
            let invalid = || CliError::InvalidPoint(pair.clone());
            let (x, y) = pair.trim().split_once(',').ok_or_else(invalid)?;
            let x = x.trim().parse::<f64>().map_err(|_| invalid())?;
            let y = y.trim().parse::<f64>().map_err(|_| invalid())?;
            Ok([x, y])
        })
        .collect()
}

fn read_objects(input: &str) -> Result<Vec<DrawableObject>, CliError> {
    let reader: Box<dyn BufRead> = if input == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(input)?))
    };

    let mut objects = Vec::new();
    for line in reader.lines() {
        if let Some(object) = parse_object_line(&line?)? {
            objects.push(object);
        }
    }
    Ok(objects)
}

/// One JSONL line as an object. Blank lines and `#` comments are skipped;
/// a missing id is filled in when the object is drawn.
fn parse_object_line(line: &str) -> Result<Option<DrawableObject>, CliError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let mut value = serde_json::from_str::<Value>(trimmed)?;
    if let Some(map) = value.as_object_mut() {
        map.entry("id").or_insert_with(|| Value::String(String::new()));
    }
    Ok(Some(serde_json::from_value(value)?))
}

fn describe(event: &ServerEvent) -> String {
    match event {
        ServerEvent::InitState(snapshot) => format!("init-state objects={}", snapshot.objects.len()),
        ServerEvent::ObjectAdded(object) => format!("object-added {} {}", object.id, object.kind()),
        ServerEvent::ObjectMoved(patch) => format!("object-moved {}", patch.id),
        ServerEvent::ObjectRemoved(id) => format!("object-removed {id}"),
        ServerEvent::BoardCleared => "board-cleared".to_owned(),
    }
}

fn print_board(scene: &Scene) {
    println!("{} object(s)", scene.len());
    for id in scene.ids() {
        let Some(object) = scene.get(&id) else {
            continue;
        };
        let t = &object.transform;
        println!("  {id}  {:<12}  left={} top={} angle={}", object.kind().as_str(), t.left, t.top, t.angle);
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
