use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable restaurant key referenced by rule results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(pub String);

impl RestaurantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantRecord {
    pub id: &'static str,
    pub name: &'static str,
    pub link: &'static str,
}

/// What adapters render once a flow ends with a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub link: String,
}

#[derive(Debug, Clone)]
pub struct RestaurantCatalog {
    records: Vec<RestaurantRecord>,
}

impl RestaurantCatalog {
    pub fn new(records: Vec<RestaurantRecord>) -> Self {
        Self { records }
    }

    pub fn standard() -> Self {
        Self::new(standard_records())
    }

    pub fn records(&self) -> &[RestaurantRecord] {
        &self.records
    }

    pub fn get(&self, id: &RestaurantId) -> Option<&RestaurantRecord> {
        self.records.iter().find(|record| record.id == id.as_str())
    }

    pub fn contains(&self, id: &RestaurantId) -> bool {
        self.get(id).is_some()
    }

    /// Ids missing from the catalog render as a title-cased id with no link.
    pub fn recommendation(&self, id: &RestaurantId) -> Recommendation {
        match self.get(id) {
            Some(record) => Recommendation {
                restaurant_id: id.clone(),
                name: record.name.to_string(),
                link: record.link.to_string(),
            },
            None => Recommendation {
                restaurant_id: id.clone(),
                name: title_case(id.as_str()),
                link: String::new(),
            },
        }
    }
}

fn title_case(id: &str) -> String {
    id.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn standard_records() -> Vec<RestaurantRecord> {
    vec![
        RestaurantRecord {
            id: "raavi",
            name: "Raavi North Indian Cuisine",
            link: "https://maps.app.goo.gl/8ov6JTFxY5rExqmv5",
        },
        RestaurantRecord {
            id: "red_chilli",
            name: "Red Chilli Halal",
            link: "https://maps.app.goo.gl/8gKJA2qMgfKkvwN86",
        },
        RestaurantRecord {
            id: "kin_khao",
            name: "Kin Khao",
            link: "https://maps.app.goo.gl/CZNLdhBdVzigb3Dp9",
        },
        RestaurantRecord {
            id: "sababa",
            name: "Sababa",
            link: "https://maps.app.goo.gl/98u7dPwLvbJWuNot6",
        },
        RestaurantRecord {
            id: "tratto",
            name: "Tratto",
            link: "https://maps.app.goo.gl/wbrDsd7HcThU3KYA9",
        },
        RestaurantRecord {
            id: "taylor_street_coffee",
            name: "Taylor Street Coffee Shop",
            link: "https://maps.app.goo.gl/4QFjRKGyJAwMzEDS7",
        },
        RestaurantRecord {
            id: "mr_charlies",
            name: "Mr. Charlie's",
            link: "https://maps.app.goo.gl/jnGzdgx8Q3nfx9xq6",
        },
        RestaurantRecord {
            id: "grove_yerba_buena",
            name: "The Grove - Yerba Buena",
            link: "https://maps.app.goo.gl/VhVPT3Kwgj5r2U1p7",
        },
        RestaurantRecord {
            id: "mkt_restaurant",
            name: "MKT Restaurant and Bar",
            link: "https://maps.app.goo.gl/nMrR8TzQc1kqtFy46",
        },
        RestaurantRecord {
            id: "brendas_french_soul",
            name: "Brenda's French Soul Food",
            link: "https://maps.app.goo.gl/YWpgozFgp2KxKwG47",
        },
        RestaurantRecord {
            id: "thats_my_jam",
            name: "That's My Jam",
            link: "https://maps.app.goo.gl/GFaq2LCCRJ1DK1oK9",
        },
        RestaurantRecord {
            id: "subway",
            name: "Subway",
            link: "https://maps.app.goo.gl/areYk9z6rXPqXWQJ6",
        },
        RestaurantRecord {
            id: "gotts_roadside",
            name: "Gott's Roadside",
            link: "https://maps.app.goo.gl/Fc1D4CgDHXZmLDJi8",
        },
        RestaurantRecord {
            id: "burger_king",
            name: "Burger King",
            link: "https://maps.app.goo.gl/9h5XNEDkL9bjNjWJA",
        },
        RestaurantRecord {
            id: "mcdonalds",
            name: "McDonald's",
            link: "https://maps.app.goo.gl/fFyy2ZGwNpQk9ALj8",
        },
        RestaurantRecord {
            id: "in_n_out",
            name: "In-N-Out Burger",
            link: "https://maps.app.goo.gl/rPyCYasEKGL2XNmPA",
        },
        RestaurantRecord {
            id: "scomas",
            name: "Scoma's Restaurant",
            link: "https://maps.app.goo.gl/GYzvJ8GG1yi98qVT9",
        },
        RestaurantRecord {
            id: "hinodeya_ramen",
            name: "HINODEYA Ramen Japantown",
            link: "https://maps.app.goo.gl/UiRRDqSKgTVviCwv8",
        },
        RestaurantRecord {
            id: "panda_express",
            name: "Panda Express",
            link: "https://maps.app.goo.gl/8mNGpbn51weKcVoH9",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_resolves_display_details() {
        let catalog = RestaurantCatalog::standard();
        assert_eq!(catalog.records().len(), 19);
        let reco = catalog.recommendation(&RestaurantId::new("raavi"));
        assert_eq!(reco.name, "Raavi North Indian Cuisine");
        assert!(reco.link.starts_with("https://maps.app.goo.gl/"));
    }

    #[test]
    fn unknown_ids_fall_back_to_title_case_without_link() {
        let catalog = RestaurantCatalog::standard();
        let reco = catalog.recommendation(&RestaurantId::new("golden_DRAGON_house"));
        assert_eq!(reco.name, "Golden Dragon House");
        assert!(reco.link.is_empty());
    }
}
