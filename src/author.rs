//! Contributors and the passages they mitigate or reject.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::range::{count_containing, PassageRange};

/// Build the stable identifier for an author: lowercase `"{prenom} {nom}"`.
pub fn author_id(prenom: &str, nom: &str) -> String {
    format!("{} {}", prenom, nom).to_lowercase()
}

/// One row of the annotation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// Lowercase `"{prenom} {nom}"`.
    pub id: String,
    pub prenom: String,
    pub nom: String,
    /// Passages the author partially endorses.
    pub mitigation: Vec<PassageRange>,
    /// Passages the author fully rejects.
    pub desaccord: Vec<PassageRange>,
    /// The author's own "Moi/Nous …" statement, if one mentions them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration: Option<String>,
    /// Any additional columns of the table, kept verbatim.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Author {
    /// Create an author with the id derived from the name parts.
    pub fn new(
        prenom: impl Into<String>,
        nom: impl Into<String>,
        mitigation: Vec<PassageRange>,
        desaccord: Vec<PassageRange>,
    ) -> Self {
        let prenom = prenom.into();
        let nom = nom.into();
        Self {
            id: author_id(&prenom, &nom),
            prenom,
            nom,
            mitigation,
            desaccord,
            declaration: None,
            extra: BTreeMap::new(),
        }
    }

    /// `"{prenom} {nom}"` as written in the table.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom)
    }

    /// Number of mitigation ranges containing `number`.
    pub fn mitigation_count(&self, number: u32) -> u32 {
        count_containing(&self.mitigation, number)
    }

    /// Number of disagreement ranges containing `number`.
    pub fn desaccord_count(&self, number: u32) -> u32 {
        count_containing(&self.desaccord, number)
    }

    /// The author's position on passage `number`.
    ///
    /// Mitigation is checked first: an author who both mitigates and rejects
    /// a passage is reported as mitigating it.
    pub fn stance_on(&self, number: u32) -> Stance {
        if self.mitigation.iter().any(|r| r.contains(number)) {
            Stance::Mitige
        } else if self.desaccord.iter().any(|r| r.contains(number)) {
            Stance::Desaccord
        } else {
            Stance::Accord
        }
    }
}

/// Position of an author on a selected passage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Mitige,
    Desaccord,
    Accord,
}

impl Stance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Mitige => "mitige",
            Stance::Desaccord => "desaccord",
            Stance::Accord => "accord",
        }
    }
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stance of every author on the selected passage, in author order.
///
/// With no selection every stance is `None`. Computed on demand, never
/// stored on [`Author`].
pub fn stances<'a>(authors: &'a [Author], selected: Option<u32>) -> Vec<(&'a str, Option<Stance>)> {
    authors
        .iter()
        .map(|author| (author.id.as_str(), selected.map(|n| author.stance_on(n))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> Author {
        Author::new(
            "Jeanne",
            "Dupont",
            vec![PassageRange::new(3, 5), PassageRange::new(4, 4)],
            vec![PassageRange::new(5, 8)],
        )
    }

    #[test]
    fn test_id_is_lowercase_full_name() {
        let author = author();
        assert_eq!(author.id, "jeanne dupont");
        assert_eq!(author.display_name(), "Jeanne Dupont");
        assert_eq!(author_id("Élise", "LE GALL"), "élise le gall");
    }

    #[test]
    fn test_counts_overlapping_ranges() {
        let author = author();
        assert_eq!(author.mitigation_count(4), 2);
        assert_eq!(author.mitigation_count(5), 1);
        assert_eq!(author.desaccord_count(5), 1);
        assert_eq!(author.desaccord_count(9), 0);
    }

    #[test]
    fn test_stance_prefers_mitigation() {
        let author = author();
        assert_eq!(author.stance_on(5), Stance::Mitige);
        assert_eq!(author.stance_on(7), Stance::Desaccord);
        assert_eq!(author.stance_on(1), Stance::Accord);
    }

    #[test]
    fn test_stances_follow_selection() {
        let authors = vec![
            author(),
            Author::new("Paul", "Martin", vec![], vec![PassageRange::single(1)]),
        ];
        assert_eq!(
            stances(&authors, Some(1)),
            vec![
                ("jeanne dupont", Some(Stance::Accord)),
                ("paul martin", Some(Stance::Desaccord)),
            ]
        );
        assert!(stances(&authors, None).iter().all(|(_, s)| s.is_none()));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(&author()).unwrap();
        assert_eq!(json["id"], "jeanne dupont");
        assert_eq!(json["mitigation"], serde_json::json!([[3, 5], [4, 4]]));
        assert!(json.get("declaration").is_none());
        assert!(json.get("extra").is_none());
    }
}
