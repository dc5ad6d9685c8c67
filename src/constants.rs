/// 定数の共通化

/// ストアファイルの既定パス
pub const DEFAULT_STORE_PATH: &str = "slurm-bgpsec.json";

/// ストアパスを上書きする環境変数
pub const STORE_PATH_ENV: &str = "BGPSEC_FILTER_STORE";

/// RFC 8416 で定義されている唯一のバージョン
pub const SLURM_VERSION: u32 = 1;

/// コメントの最大文字数
pub const MAX_COMMENT_LEN: usize = 2000;

/// ストアが最初に払い出すID
pub const FIRST_FILTER_ID: u64 = 1;

/// Routinatorの実行ファイル名
pub const ROUTINATOR_BIN: &str = "routinator";

/// ルーター鍵を含めてVRPをJSONで出力させる引数
pub const ROUTINATOR_ARGS: &[&str] = &[
    "--enable-bgpsec",
    "vrps",
    "--format",
    "json",
    "--output",
    "-",
];

/// ストアが一時的に使えないときの終了コード (sysexits.h の EX_TEMPFAIL)
pub const EXIT_RETRYABLE: i32 = 75;
