//! quillmate CLI client: creative-writing assistant.
//!
//! One subcommand per server endpoint; each call posts to a running
//! `quillmate-server` and prints the rendered result.

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};

#[derive(Parser)]
#[command(name = "quill", version, about = "Creative-writing assistant client")]
struct Cli {
    /// Base URL of the quillmate server.
    #[arg(long, global = true, default_value = "http://127.0.0.1:8000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fresh piece from a mode, genre, and tone.
    Generate {
        /// Opening text the piece should start with.
        input_text: String,

        /// Kind of piece (Story, Poem, Microfiction, Dialogue, ...).
        #[arg(long, default_value = "Story")]
        mode: String,

        /// Genre to write in.
        #[arg(long, default_value = "")]
        genre: String,

        /// Tone to hold.
        #[arg(long, default_value = "")]
        tone: String,
    },

    /// Continue a piece in the same tone and style.
    Expand {
        /// The text to continue.
        input_text: String,

        /// Kind of piece being continued.
        #[arg(long, default_value = "Story")]
        mode: String,
    },

    /// Analyze the tone and writing style of a text.
    Analyze {
        /// The text to analyze.
        input_text: String,
    },

    /// Rewrite a text in the uploaded style.
    Enhance {
        /// The text to rewrite.
        input_text: String,

        /// Extra instruction for the rewrite.
        #[arg(long)]
        style: Option<String>,
    },

    /// Write something new in the uploaded style.
    Mimic {
        /// The text to transform.
        input_text: String,

        /// Extra instruction for the rewrite.
        #[arg(long)]
        style: Option<String>,
    },

    /// Upload a .txt or .pdf writing sample.
    Upload {
        /// Path to the sample file.
        file: PathBuf,
    },

    /// Export text as a PDF.
    ExportPdf {
        /// The text to render.
        text: String,

        /// Output path for the PDF.
        #[arg(long, default_value = "quillmate_output.pdf")]
        out: PathBuf,
    },

    /// Run the style index self-test on the server.
    TestIndex,

    /// Check server health.
    Health,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    match cli.command {
        Commands::Generate {
            input_text,
            mode,
            genre,
            tone,
        } => {
            let body = serde_json::json!({
                "mode": mode, "genre": genre, "tone": tone, "input_text": input_text,
            });
            print_output(&post_json(&server, "/generate/", &body)?);
        }
        Commands::Expand { input_text, mode } => {
            let body = serde_json::json!({ "mode": mode, "input_text": input_text });
            print_output(&post_json(&server, "/expand/", &body)?);
        }
        Commands::Analyze { input_text } => {
            let body = serde_json::json!({ "input_text": input_text });
            print_output(&post_json(&server, "/analyze/", &body)?);
        }
        Commands::Enhance { input_text, style } => {
            let body = rewrite_body(&input_text, style.as_deref());
            print_output(&post_json(&server, "/enhance/", &body)?);
        }
        Commands::Mimic { input_text, style } => {
            let body = rewrite_body(&input_text, style.as_deref());
            print_output(&post_json(&server, "/mimic/", &body)?);
        }
        Commands::Upload { file } => {
            let response = upload_file(&server, &file)?;
            if let Some(status) = response["status"].as_str() {
                println!("{status}");
            }
            if let Some(preview) = response["preview"].as_str() {
                println!("\n--- preview ---\n{preview}");
            }
        }
        Commands::ExportPdf { text, out } => {
            export_pdf(&server, &text, &out)?;
            println!("wrote {}", out.display());
        }
        Commands::TestIndex => {
            let response = get_json(&server, "/test-index/")?;
            println!("{}", response["status"].as_str().unwrap_or("unknown"));
        }
        Commands::Health => {
            let response = get_json(&server, "/health")?;
            println!(
                "status: {}, version: {}, sample loaded: {}",
                response["status"].as_str().unwrap_or("unknown"),
                response["version"].as_str().unwrap_or("unknown"),
                response["sample_loaded"].as_bool().unwrap_or(false),
            );
        }
    }

    Ok(())
}

fn rewrite_body(input_text: &str, style: Option<&str>) -> serde_json::Value {
    match style {
        Some(style) => serde_json::json!({ "input_text": input_text, "style": style }),
        None => serde_json::json!({ "input_text": input_text }),
    }
}

fn print_output(response: &serde_json::Value) {
    println!("{}", response["output"].as_str().unwrap_or(""));
}

fn post_json(server: &str, path: &str, body: &serde_json::Value) -> Result<serde_json::Value> {
    let url = format!("{server}{path}");
    let response = ureq::post(&url)
        .set("Content-Type", "application/json")
        .send_string(&body.to_string());
    parse_response(&url, response)
}

fn get_json(server: &str, path: &str) -> Result<serde_json::Value> {
    let url = format!("{server}{path}");
    parse_response(&url, ureq::get(&url).call())
}

fn parse_response(
    url: &str,
    response: std::result::Result<ureq::Response, ureq::Error>,
) -> Result<serde_json::Value> {
    let body = match response {
        Ok(resp) => resp.into_string().into_diagnostic()?,
        // The server answers errors with a JSON body worth surfacing.
        Err(ureq::Error::Status(code, resp)) => {
            let body = resp.into_string().unwrap_or_default();
            return Err(miette!("{url} returned {code}: {body}"));
        }
        Err(e) => return Err(miette!("request to {url} failed: {e}")),
    };
    serde_json::from_str(&body).into_diagnostic()
}

fn upload_file(server: &str, file: &std::path::Path) -> Result<serde_json::Value> {
    let data = std::fs::read(file).into_diagnostic()?;
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let boundary = "quillmate-upload-boundary";
    let mut body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(&data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let url = format!("{server}/upload/");
    let response = ureq::post(&url)
        .set(
            "Content-Type",
            &format!("multipart/form-data; boundary={boundary}"),
        )
        .send_bytes(&body);
    parse_response(&url, response)
}

fn export_pdf(server: &str, text: &str, out: &std::path::Path) -> Result<()> {
    let url = format!("{server}/export-pdf/");
    let body = serde_json::json!({ "text": text });
    let response = ureq::post(&url)
        .set("Content-Type", "application/json")
        .send_string(&body.to_string());

    match response {
        Ok(resp) => {
            let mut bytes = Vec::new();
            resp.into_reader()
                .read_to_end(&mut bytes)
                .into_diagnostic()?;
            std::fs::write(out, bytes).into_diagnostic()?;
            Ok(())
        }
        Err(ureq::Error::Status(code, resp)) => {
            let body = resp.into_string().unwrap_or_default();
            Err(miette!("export failed ({code}): {body}"))
        }
        Err(e) => Err(miette!("request to {url} failed: {e}")),
    }
}
