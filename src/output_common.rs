use std::path::Path;
use tokio::fs;
use tokio::io::{self, AsyncWriteExt};

/// 汎用ヘッダー生成: こちらは非同期要素がないのでそのまま
pub fn make_header(now_str: &str, source: &str, filter_count: usize) -> String {
    format!(
        "# Generated at: {}\n# Source: {}\n# BGPsec filters applied: {}\n\n",
        now_str, source, filter_count
    )
}

/// 出力先が "-" なら標準出力、それ以外はファイルを丸ごと書き込む
pub async fn write_output<P: AsRef<Path>>(path: P, content: &str) -> Result<(), io::Error> {
    let path = path.as_ref();
    if path == Path::new("-") {
        let mut stdout = io::stdout();
        stdout.write_all(content.as_bytes()).await?;
        stdout.flush().await?;
    } else {
        fs::write(path, content).await?;
    }
    Ok(())
}

/// TXT出力用の共通ヘルパー: 1行1エントリ
pub fn render_lines<I, T>(header: &str, lines: I) -> String
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    let body = lines
        .into_iter()
        .map(|line| line.to_string())
        .collect::<Vec<_>>()
        .join("\n");

    if body.is_empty() {
        header.to_string()
    } else {
        format!("{}{}\n", header, body)
    }
}
