//! Shared constants used across the application.

/// User agent string sent with every HTTP request.
///
/// The notice board rejects obvious bot traffic, so requests identify as a
/// desktop Chrome browser.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Academic notice listing page.
pub const DEFAULT_LISTING_URL: &str = "https://www.gachon.ac.kr/kor/3104/subview.do";

/// Origin prepended to the page-relative post links.
pub const DEFAULT_SITE_ORIGIN: &str = "https://www.gachon.ac.kr";

/// Checkpoint file, relative to the working directory.
pub const DEFAULT_CHECKPOINT_PATH: &str = "last_post_id.txt";

/// Default timeout applied to each HTTP request, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// Discord message texts
pub const MESSAGE_CONTENT: &str = "@here 가천대학교에 새로운 학사공지가 올라왔어요!";
pub const EMBED_TITLE_PREFIX: &str = "📄 ";
pub const EMBED_DESCRIPTION: &str = "자세한 내용은 링크를 클릭해 확인하세요.";
/// Gachon blue, packed RGB.
pub const EMBED_COLOR: u32 = 15_258_703;
pub const EMBED_FOOTER_TEXT: &str = "가천대 학사공지 알리미 봇";
pub const EMBED_FOOTER_ICON_URL: &str =
    "https://www.gachon.ac.kr/images/kor/intro/img_visual_symbol.jpg";
