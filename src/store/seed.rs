//! Built-in content used when neither the service nor local persistence has
//! anything to offer.
//!
//! Dates are fixed so the seed set is identical on every run.

use chrono::NaiveDate;

use crate::model::{
    Article, ArticleStatus, BreakingTickerConfig, Category, CategorySpot, EPaperItem,
    HomePageContent, Placement, YouTubeVideo, PLACEHOLDER_IMAGE,
};
use crate::util::{estimate_read_time, slugify};

use super::snapshot::Supplementary;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

struct SeedArticle {
    id: &'static str,
    title: &'static str,
    summary: &'static str,
    content: &'static str,
    category: Category,
    tags: &'static [&'static str],
    author: &'static str,
    date: (i32, u32, u32),
    views: u64,
    placement: Placement,
}

fn placement(is_hero: bool, spot: CategorySpot) -> Placement {
    Placement {
        is_hero,
        home_section: None,
        category_spot: spot,
    }
}

fn seed_articles() -> [SeedArticle; 6] {
    [
        SeedArticle {
            id: "seed-1",
            title: "City Council Approves New Transit Budget",
            summary: "The council voted 9-2 to expand late-night bus service.",
            content: "<p>The city council approved a revised transit budget on Tuesday, \
                      expanding late-night bus service across four districts.</p>",
            category: Category::National,
            tags: &["Transit", "City Council"],
            author: "Staff Reporter",
            date: (2025, 1, 14),
            views: 1520,
            placement: placement(true, CategorySpot::Featured),
        },
        SeedArticle {
            id: "seed-2",
            title: "Regional Summit Ends With Trade Agreement",
            summary: "Leaders signed a framework to cut tariffs on farm goods.",
            content: "<p>Delegates closed the three-day summit by signing a framework \
                      agreement on agricultural tariffs.</p>",
            category: Category::International,
            tags: &["Trade", "Diplomacy"],
            author: "Foreign Desk",
            date: (2025, 1, 13),
            views: 980,
            placement: placement(false, CategorySpot::Featured),
        },
        SeedArticle {
            id: "seed-3",
            title: "Markets Close Higher on Strong Earnings",
            summary: "Banking and energy stocks led the session's gains.",
            content: "<p>Benchmark indices finished the day higher as quarterly \
                      earnings beat expectations.</p>",
            category: Category::Business,
            tags: &["Markets", "Economy"],
            author: "Business Desk",
            date: (2025, 1, 12),
            views: 2210,
            placement: placement(false, CategorySpot::Grid),
        },
        SeedArticle {
            id: "seed-4",
            title: "Home Side Clinches Series in Final Over",
            summary: "A late boundary sealed a two-wicket win.",
            content: "<p>The home team chased down the target with two balls to spare \
                      to win the series 2-1.</p>",
            category: Category::Sports,
            tags: &["Cricket"],
            author: "Sports Desk",
            date: (2025, 1, 12),
            views: 3105,
            placement: placement(false, CategorySpot::Grid),
        },
        SeedArticle {
            id: "seed-5",
            title: "Clinics Extend Evening Hours for Flu Season",
            summary: "Public clinics will stay open until 9 pm through March.",
            content: "<p>The health department announced extended clinic hours to \
                      handle the seasonal rise in flu cases.</p>",
            category: Category::Health,
            tags: &["Public Health", "Flu"],
            author: "Health Correspondent",
            date: (2025, 1, 11),
            views: 640,
            placement: placement(false, CategorySpot::None),
        },
        SeedArticle {
            id: "seed-6",
            title: "Startups Bet on Local Language AI Tools",
            summary: "Three new ventures target regional-language users.",
            content: "<p>A wave of startups is building assistants that work in \
                      regional languages first.</p>",
            category: Category::Technology,
            tags: &["AI", "Startups"],
            author: "Tech Desk",
            date: (2025, 1, 10),
            views: 1190,
            placement: placement(false, CategorySpot::Featured),
        },
    ]
}

/// The fixed article set used when the service is unreachable and nothing
/// was persisted.
pub fn articles() -> Vec<Article> {
    seed_articles()
        .into_iter()
        .map(|s| Article {
            id: s.id.to_string(),
            title: s.title.to_string(),
            summary: s.summary.to_string(),
            content: s.content.to_string(),
            image: PLACEHOLDER_IMAGE.to_string(),
            category: s.category,
            tags: s.tags.iter().map(|t| t.to_string()).collect(),
            author: s.author.to_string(),
            publish_date: date(s.date.0, s.date.1, s.date.2),
            read_time: Some(estimate_read_time(s.content)),
            views: s.views,
            status: ArticleStatus::Published,
            slug: slugify(s.title),
            placement: s.placement,
        })
        .collect()
}

/// Default client-owned state.
pub fn supplementary() -> Supplementary {
    Supplementary {
        tags: [
            "Politics", "Economy", "Markets", "Cricket", "Public Health", "AI", "Trade",
            "Transit",
        ]
        .iter()
        .map(|t| t.to_string())
        .collect(),
        epapers: vec![
            EPaperItem {
                id: "epaper-1".to_string(),
                title: "Morning Edition".to_string(),
                upload_date: date(2025, 1, 14),
                file_url: "/epapers/2025-01-14.pdf".to_string(),
            },
            EPaperItem {
                id: "epaper-2".to_string(),
                title: "Morning Edition".to_string(),
                upload_date: date(2025, 1, 13),
                file_url: "/epapers/2025-01-13.pdf".to_string(),
            },
        ],
        videos: vec![
            YouTubeVideo {
                id: "video-1".to_string(),
                title: "Evening Bulletin".to_string(),
                url: "https://www.youtube.com/watch?v=bulletin01".to_string(),
                is_mini_player: true,
            },
            YouTubeVideo {
                id: "video-2".to_string(),
                title: "Budget Explained".to_string(),
                url: "https://www.youtube.com/watch?v=budget0001".to_string(),
                is_mini_player: false,
            },
            YouTubeVideo {
                id: "video-3".to_string(),
                title: "Match Highlights".to_string(),
                url: "https://www.youtube.com/watch?v=highlight1".to_string(),
                is_mini_player: false,
            },
        ],
        mini_player_enabled: true,
        ticker: BreakingTickerConfig {
            items: vec![
                "Transit budget approved for late-night service".to_string(),
                "Trade framework signed at regional summit".to_string(),
                "Clinics extend evening hours through March".to_string(),
            ],
            speed_ms: BreakingTickerConfig::DEFAULT_SPEED_MS,
            pause_on_hover: true,
        },
        home: HomePageContent::default(),
    }
}
