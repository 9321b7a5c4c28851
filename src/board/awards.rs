use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;

use serde::{Deserialize, Serialize};

use crate::board::*;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct AwardDef {
    pub id: &'static str,
    pub label: &'static str,
}

/// The awards that can be given.
pub static AWARDS: [AwardDef; 9] = [
    AwardDef {
        id: "bronze",
        label: "Бронза",
    },
    AwardDef {
        id: "silver",
        label: "Серебро",
    },
    AwardDef {
        id: "gold",
        label: "Золото",
    },
    AwardDef {
        id: "platinum",
        label: "Платина",
    },
    AwardDef {
        id: "white-chair",
        label: "Белый стул",
    },
    AwardDef {
        id: "tg-premium",
        label: "Telegram Premium",
    },
    AwardDef {
        id: "gpt",
        label: "GPT",
    },
    AwardDef {
        id: "coffee",
        label: "Кофе на 2К",
    },
    AwardDef {
        id: "palm",
        label: "Пальма",
    },
];

fn backup_path(path: &str) -> String {
    format!("{}.bak", path)
}

pub fn find_award(id: &str) -> Option<&'static AwardDef> {
    AWARDS.iter().find(|a| a.id == id)
}

/// The awards of each employee, in the order they were given.
///
/// Stored as a JSON object from employee names to lists of award ids.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AwardStore {
    awards: BTreeMap<String, Vec<String>>,
}

impl AwardStore {
    /// A missing file is an empty store. So is a file that cannot be parsed:
    /// it is first copied to `<path>.bak`, since the next save overwrites it.
    pub fn load(path: &str) -> BoardResult<AwardStore> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No awards file at {:?}, starting without awards", path);
                return Ok(AwardStore::default());
            }
            Err(e) => return Err(e).context(ReadingFileSnafu { path }),
        };
        match serde_json::from_str::<AwardStore>(contents.as_str()) {
            Ok(store) => {
                debug!("AwardStore::load: {:?}", store);
                Ok(store)
            }
            Err(e) => {
                let backup = backup_path(path);
                fs::copy(path, &backup).context(WritingFileSnafu {
                    path: backup.clone(),
                })?;
                warn!(
                    "Could not parse the awards file {:?}, starting without awards. \
                    The file was copied to {:?}: {}",
                    path, backup, e
                );
                Ok(AwardStore::default())
            }
        }
    }

    pub fn save(&self, path: &str) -> BoardResult<()> {
        let contents = serde_json::to_string_pretty(self).context(SerializingJsonSnafu {})?;
        fs::write(path, contents).context(WritingFileSnafu { path })
    }

    /// Returns false if the employee already had this award.
    pub fn give(&mut self, name: &str, id: &str) -> BoardResult<bool> {
        let award = find_award(id).context(UnknownAwardSnafu { id })?;
        let list = self.awards.entry(name.to_string()).or_default();
        if list.iter().any(|a| a == award.id) {
            debug!("give: {:?} already has {:?}", name, id);
            return Ok(false);
        }
        info!("Giving {} ({}) to {:?}", award.label, award.id, name);
        list.push(award.id.to_string());
        Ok(true)
    }

    /// Returns false if the employee did not have this award.
    pub fn revoke(&mut self, name: &str, id: &str) -> BoardResult<bool> {
        let award = find_award(id).context(UnknownAwardSnafu { id })?;
        let list = match self.awards.get_mut(name) {
            Some(l) => l,
            None => return Ok(false),
        };
        let before = list.len();
        list.retain(|a| a != award.id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.awards.remove(name);
        }
        if removed {
            info!("Revoking {} ({}) from {:?}", award.label, award.id, name);
        }
        Ok(removed)
    }

    pub fn awards_of(&self, name: &str) -> &[String] {
        self.awards.get(name).map(|l| l.as_slice()).unwrap_or(&[])
    }
}
