//! Built-in dashboard contents used on first run and after a reset.

use crate::model::{Category, Link};

const BLOG_FAVICON: &str = "https://blog.wedp.dpdns.org/jpg/favicon.ico";

/// `(id, title, url, description, icon)`
type LinkRow = (&'static str, &'static str, &'static str, &'static str, Option<&'static str>);

const PROJECT_LINKS: &[LinkRow] = &[
    ("1", "Blog", "https://cdn.zxlwq.dpdns.org", "科技刘-博客", Some(BLOG_FAVICON)),
    ("2", "Home", "https://home.zxlwq.dpdns.org", "科技刘-主页", Some(BLOG_FAVICON)),
    ("3", "News", "https://news.zxlwq.dpdns.org", "科技刘-新闻资讯", Some(BLOG_FAVICON)),
    (
        "4",
        "Qinglong",
        "https://qg.zxlwq.dpdns.org",
        "青龙面板",
        Some("https://cdn.jsdelivr.net/gh/homarr-labs/dashboard-icons/svg/qinglong.svg"),
    ),
    (
        "5",
        "N8N",
        "https://base.zxlwq.dpdns.org",
        "N8N 工作流",
        Some("https://cdn.jsdelivr.net/gh/homarr-labs/dashboard-icons/svg/n8n.svg"),
    ),
    ("6", "Music", "https://music.zxlwq.dpdns.org", "科技刘-音乐播放器", Some(BLOG_FAVICON)),
    ("7", "Player", "https://player.zxlwq.dpdns.org", "科技刘-音乐播放器", Some(BLOG_FAVICON)),
    ("8", "Splayer", "https://splayer.zxlwq.dpdns.org", "科技刘-网易云音乐", Some(BLOG_FAVICON)),
    ("9", "ZxlwqTV", "https://ltv.zxlwq.dpdns.org", "科技刘-在线影视", Some(BLOG_FAVICON)),
    (
        "10",
        "LibreTV",
        "https://tv.zxlwq.dpdns.org",
        "LibreTV",
        Some("https://blog.wedp.dpdns.org/jpg/logo.webp"),
    ),
    ("11", "SNav", "https://snav.zxlwq.dpdns.org", "科技刘-搜索引擎", Some(BLOG_FAVICON)),
    ("12", "linklet", "https://linklet.zxlwq.dpdns.org", "科技刘-短链生成", Some(BLOG_FAVICON)),
    ("13", "Drive", "https://rz.zxlwq.dpdns.org", "科技刘-网盘", Some(BLOG_FAVICON)),
    ("14", "Pixpro", "https://pixpro.zxlwq.dpdns.org", "科技刘-图床", Some(BLOG_FAVICON)),
    ("15", "TG-Image", "https://tga.zxlwq.dpdns.org", "科技刘-图床", Some(BLOG_FAVICON)),
    ("16", "TG-Image", "https://tg.zxlwq.dpdns.org", "科技刘-图床", Some(BLOG_FAVICON)),
    ("17", "Cover", "https://cover.zxlwq.dpdns.org", "科技刘-封面生成", Some(BLOG_FAVICON)),
    ("18", "Mail", "https://mail.zxlwq.dpdns.org", "科技刘-临时邮件", Some(BLOG_FAVICON)),
    ("19", "Tool", "https://tool.zxlwq.dpdns.org", "科技刘-工具箱", Some(BLOG_FAVICON)),
    ("20", "AI-Image", "https://ai.wedp.dpdns.org", "科技刘-文生图", Some(BLOG_FAVICON)),
    ("21", "Sub", "https://sub.zxlwq.dpdns.org", "科技刘-订阅优选", Some(BLOG_FAVICON)),
    ("22", "Sub-Web", "https://subw.zxlwq.dpdns.org", "科技刘-订阅转换", Some(BLOG_FAVICON)),
    ("23", "Base58", "https://basea.zxlwq.dpdns.org", "科技刘-Base58", Some(BLOG_FAVICON)),
];

const DEV_LINKS: &[LinkRow] = &[
    ("1", "GitHub", "https://github.com", "代码托管平台", None),
    ("2", "Stack Overflow", "https://stackoverflow.com", "开发者问答社区", None),
    ("3", "Cloudflare", "https://dash.cloudflare.com", "网络基础设施与安全", None),
    ("4", "Tailwind CSS", "https://tailwindcss.com", "原子化 CSS 框架", None),
];

const DESIGN_LINKS: &[LinkRow] = &[
    ("5", "Figma", "https://figma.com", "在线界面设计工具", None),
    ("6", "Dribbble", "https://dribbble.com", "设计灵感社区", None),
    ("7", "Unsplash", "https://unsplash.com", "免费高清图库", None),
];

const SOCIAL_LINKS: &[LinkRow] = &[
    ("8", "Reddit", "https://reddit.com", "互联网头版", None),
    ("9", "Hacker News", "https://news.ycombinator.com", "极客新闻", None),
    ("10", "Product Hunt", "https://producthunt.com", "新产品发现", None),
];

const TOOL_LINKS: &[LinkRow] = &[
    ("11", "ChatGPT", "https://chat.openai.com", "AI 对话助手", None),
    ("12", "Google Gemini", "https://gemini.google.com", "谷歌 AI 模型", None),
    ("13", "Excalidraw", "https://excalidraw.com", "虚拟白板绘图", None),
];

fn links(rows: &[LinkRow]) -> Vec<Link> {
    rows.iter()
        .map(|&(id, title, url, description, icon)| {
            let link = Link::new(id, title, url).with_description(description);
            match icon {
                Some(icon) => link.with_icon(icon),
                None => link,
            }
        })
        .collect()
}

#[must_use]
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("zxlwq", "我的项目")
            .with_icon("Layout")
            .with_links(links(PROJECT_LINKS)),
        Category::new("dev", "开发")
            .with_icon("Code")
            .with_links(links(DEV_LINKS)),
        Category::new("design", "设计与素材")
            .with_icon("Palette")
            .with_links(links(DESIGN_LINKS)),
        Category::new("social", "社区与资讯")
            .with_icon("Globe")
            .with_links(links(SOCIAL_LINKS)),
        Category::new("tools", "常用工具")
            .with_icon("Zap")
            .with_links(links(TOOL_LINKS)),
    ]
}
