// config
pub const CONFIG_FILE_NAME: &str = ".autocommitrc";
pub const GITIGNORE_FILE_NAME: &str = ".gitignore";
pub const DEFAULT_TARGET_BRANCH: &str = "origin/main";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const MAX_TEMPERATURE: f32 = 2.0;
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-haiku-20240307";

// generation
pub const MAX_LINES_LIMIT: u8 = 20;
pub const MR_MAX_CHARS: usize = 1400;

// diff
pub const DEFAULT_CONTEXT: u32 = 20;
pub const DIFF_SIZE_WARNING_BYTES: usize = 100 * 1024;

// providers
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const ANTHROPIC_MAX_TOKENS: u32 = 1500;
pub const PROVIDER_TIMEOUT_SECS: u64 = 120;
pub const MODEL_CALL_FAILED: &str = "[Model call failed]";

// editor
pub const FALLBACK_EDITOR: &str = "nano";
