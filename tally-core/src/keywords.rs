//! Deterministic keyword classifier.
//!
//! Maps a free-text description to a [`Category`] by counting substring hits
//! against a static keyword table. Offline, total, and side-effect free; it is
//! also the fallback for every failure of the remote classifier.

use crate::category::Category;

/// Anything that can turn a description into a category.
///
/// Implementations must be total: every input yields one of
/// [`Category::ALL`].
pub trait Classifier {
    fn classify(&self, description: &str) -> Category;
}

/// Lowercase substring patterns per category, in table order.
///
/// Ties between categories resolve to the earlier row. `Other` has no row;
/// it is the result when nothing matches.
pub static KEYWORD_TABLE: &[(Category, &[&str])] = &[
    (
        Category::Food,
        &[
            // grocery chains; "biedron" also covers inflected "Biedronce"
            "biedron", "lidl", "kaufland", "auchan", "carrefour", "tesco",
            "żabka", "zabka", "lewiatan", "delikatesy", "market", "sklep spożywczy",
            // restaurants
            "restauracja", "mcdonald", "kfc", "pizza", "kebab", "burger king",
            "subway", "sushi", "bar mleczny", "bistro", "food", "jedzenie",
            // bakeries and cafes
            "piekarnia", "cukiernia", "kawiarnia", "cafe", "costa", "starbucks",
            // products
            "chleb", "bułka", "bulka", "mleko", "ser", "masło", "maslo",
            "mięso", "mieso", "wędlina", "wedlina", "owoce", "warzywa",
        ],
    ),
    (
        Category::Transport,
        &[
            // fuel
            "orlen", "bp", "shell", "lotos", "circle k", "station", "paliwo",
            "benzyna", "diesel", "lpg",
            // public transport
            "mpk", "ztm", "pkp", "koleje", "intercity", "bilet", "przejazd",
            "autobus", "tramwaj", "metro", "skm", "pkm",
            // taxis and cars
            "uber", "bolt", "free now", "taxi", "parking", "parkomat",
            "myjnia", "warsztat", "auto", "mechanik",
        ],
    ),
    (
        Category::Entertainment,
        &[
            // streaming
            "netflix", "spotify", "hbo", "disney", "apple tv", "prime video",
            "youtube premium", "tidal",
            // cinema and stage
            "cinema city", "multikino", "helios", "kino", "teatr", "opera",
            "filharmonia", "koncert", "festiwal",
            // games
            "steam", "playstation", "xbox", "nintendo", "epic games", "gog",
            // other
            "empik", "książka", "muzeum", "galeria", "zoo", "aquapark",
            "escape room", "bowling", "bilard",
        ],
    ),
    (
        Category::Home,
        &[
            // furniture and appliances
            "ikea", "agata", "black red white", "jysk", "home&you",
            "media markt", "mediamarkt", "rtv euro", "euro agd", "electro",
            "saturn", "komputronik", "x-kom", "morele",
            // DIY
            "obi", "castorama", "leroy merlin", "bricomarche", "budmat",
            "narzędzia", "narzedzia", "farby", "cement", "remont",
            // utilities
            "czynsz", "energia", "tauron", "pge", "enea", "energa",
            "gaz", "pgnig", "woda", "mpwik", "wodociągi", "wodociagi",
            // telecom
            "orange", "play", "plus", "t-mobile", "netia", "vectra",
            "internet", "abonament", "telefon", "komórka", "komorka",
        ],
    ),
    (
        Category::Health,
        &[
            // pharmacies
            "apteka", "pharmacy", "gemini", "dbam o zdrowie", "doz",
            "lek", "leki", "recepta", "witaminy", "suplementy",
            // clinics
            "przychodnia", "poradnia", "szpital", "klinika", "lekarz",
            "dentysta", "stomatolog", "okulista", "optyk", "vision express",
            "ortodonta", "protetyka",
            // sport and wellness
            "siłownia", "silownia", "fitness", "gym", "fit", "trening",
            "basen", "pływalnia", "plywalnia", "spa", "wellness",
            "masaż", "masaz", "rehabilitacja", "fizjoterapia", "joga",
        ],
    ),
];

/// Number of keyword hits per category, in table order.
pub fn score(description: &str) -> Vec<(Category, usize)> {
    let desc = description.to_lowercase();
    KEYWORD_TABLE
        .iter()
        .map(|(category, keywords)| {
            let hits = keywords.iter().filter(|k| desc.contains(*k)).count();
            (*category, hits)
        })
        .collect()
}

/// Categorize a description by keyword hits.
///
/// The category with the most hits wins; ties go to the earlier table row.
/// No hits at all yields [`Category::Other`].
pub fn classify(description: &str) -> Category {
    let mut best = (Category::Other, 0);
    for (category, hits) in score(description) {
        // strictly greater keeps the first row on ties
        if hits > best.1 {
            best = (category, hits);
        }
    }
    best.0
}

/// [`Classifier`] backed by [`KEYWORD_TABLE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl Classifier for KeywordClassifier {
    fn classify(&self, description: &str) -> Category {
        classify(description)
    }
}
