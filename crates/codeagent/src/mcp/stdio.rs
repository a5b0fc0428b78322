use crate::prelude::{eprintln, *};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

pub async fn run_stdio(context: super::Context) -> Result<()> {
    if context.global.verbose {
        eprintln!("Starting MCP server with stdio transport...");
        eprintln!();
    }

    serve_lines(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        &context,
    )
    .await
}

/// Answers one JSON-RPC message per line until the reader hits EOF.
pub async fn serve_lines<R, W>(mut reader: R, mut writer: W, context: &super::Context) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }

        let message = line.trim();
        if message.is_empty() {
            continue;
        }

        if context.global.verbose {
            eprintln!("Received: {message}");
        }

        let response = super::handle_request(message, context).await;
        let response_json = serde_json::to_string(&response)?;

        if context.global.verbose {
            eprintln!("Sending: {response_json}");
        }

        writer.write_all(response_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    Ok(())
}
