use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str, Utf32String};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

use super::remnant::RemnantRecord;

/// Sentinel shown at the top of the material selector
pub const ALL_MATERIALS: &str = "All";

/// Which materials the catalog should show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MaterialFilter {
    #[default]
    All,
    Only(String),
}

impl FromStr for MaterialFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_MATERIALS {
            Ok(MaterialFilter::All)
        } else {
            Ok(MaterialFilter::Only(s.to_string()))
        }
    }
}

/// How a material filter value is compared against a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaterialMatch {
    /// Case-sensitive equality
    #[default]
    Exact,
    /// Case-insensitive substring
    Contains,
}

/// Case-insensitive substring matcher over remnant fields
///
/// Wraps a nucleo matcher configured for plain substring atoms, so a query
/// never fuzzy-matches across gaps. Every operation keeps input order.
pub struct SearchIndex {
    matcher: Matcher,
    material_match: MaterialMatch,
    buf: Vec<char>,
}

impl SearchIndex {
    pub fn new() -> Self {
        SearchIndex {
            matcher: Matcher::new(Config::DEFAULT),
            material_match: MaterialMatch::default(),
            buf: Vec::new(),
        }
    }

    pub fn with_material_match(mut self, material_match: MaterialMatch) -> Self {
        self.material_match = material_match;
        self
    }

    pub fn material_match(&self) -> MaterialMatch {
        self.material_match
    }

    /// Keep records whose name, material, or dimensions contain `query`
    /// An empty query keeps everything
    pub fn search<'a, I>(&mut self, records: I, query: &str) -> Vec<&'a RemnantRecord>
    where
        I: IntoIterator<Item = &'a RemnantRecord>,
    {
        if query.is_empty() {
            return records.into_iter().collect();
        }

        let atom = substring_atom(query);
        records
            .into_iter()
            .filter(|record| {
                [&record.name, &record.material, &record.dimensions]
                    .into_iter()
                    .any(|field| self.matches(&atom, field))
            })
            .collect()
    }

    /// Keep records matching the material filter
    pub fn filter_by_material<'a, I>(
        &mut self,
        records: I,
        filter: &MaterialFilter,
    ) -> Vec<&'a RemnantRecord>
    where
        I: IntoIterator<Item = &'a RemnantRecord>,
    {
        let wanted = match filter {
            MaterialFilter::All => return records.into_iter().collect(),
            MaterialFilter::Only(material) => material,
        };

        match self.material_match {
            MaterialMatch::Exact => records
                .into_iter()
                .filter(|record| &record.material == wanted)
                .collect(),
            MaterialMatch::Contains => {
                if wanted.is_empty() {
                    return records.into_iter().collect();
                }
                let atom = substring_atom(wanted);
                records
                    .into_iter()
                    .filter(|record| self.matches(&atom, &record.material))
                    .collect()
            }
        }
    }

    fn matches(&mut self, atom: &Atom, haystack: &str) -> bool {
        let haystack = Utf32Str::new(haystack, &mut self.buf);
        atom.score(haystack, &mut self.matcher).is_some()
    }
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Haystacks reach the matcher with each grapheme cluster reduced to its
/// first char, so the needle goes through the same reduction
fn substring_atom(needle: &str) -> Atom {
    let needle: String = Utf32String::from(needle).slice(..).chars().collect();
    Atom::new(
        &needle,
        CaseMatching::Ignore,
        Normalization::Never,
        AtomKind::Substring,
        false,
    )
}
