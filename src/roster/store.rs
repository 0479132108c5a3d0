use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::info;

use crate::engine::{apply_draw_history, reset_history, select_group};
use crate::roster::{current_timestamp, dedup_ids, DrawRecord, DrawnEntry, Group, Roster};
use crate::Candidate;

const MAX_HISTORY: usize = 100;

pub struct RosterStore {
    path: PathBuf,
    roster: RwLock<Roster>,
}

impl RosterStore {
    pub async fn load(path: PathBuf) -> Result<Self, String> {
        let roster = if path.exists() {
            let data = tokio::fs::read_to_string(&path)
                .await
                .map_err(|err| format!("failed to read roster: {}", err))?;
            if data.trim().is_empty() {
                Roster::default()
            } else {
                serde_json::from_str(&data)
                    .map_err(|err| format!("failed to parse roster: {}", err))?
            }
        } else {
            Roster::default()
        };

        Ok(Self {
            path,
            roster: RwLock::new(roster),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn snapshot(&self) -> Roster {
        let guard = self.roster.read().await;
        guard.clone()
    }

    pub async fn candidates(&self) -> Vec<Candidate> {
        let guard = self.roster.read().await;
        guard.candidates.clone()
    }

    pub async fn groups(&self) -> Vec<Group> {
        let guard = self.roster.read().await;
        guard.groups.clone()
    }

    pub async fn history(&self, limit: usize) -> Vec<DrawRecord> {
        let guard = self.roster.read().await;
        guard.history.iter().take(limit).cloned().collect()
    }

    /// Members of the named group, in roster order.
    pub async fn group_pool(&self, name: &str) -> Result<Vec<Candidate>, String> {
        let guard = self.roster.read().await;
        let group = guard
            .find_group(name)
            .ok_or_else(|| format!("group not found: {}", name))?;
        select_group(&guard.candidates, &group.members).map_err(|err| err.to_string())
    }

    pub async fn add_candidate(&self, name: &str, grade: Option<f64>) -> Result<Candidate, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("candidate name must not be empty".to_string());
        }

        let candidate = self
            .commit(|roster| {
                let mut candidate = Candidate::new(roster.derive_candidate_id(name), name);
                candidate.last_grade = grade;
                roster.candidates.push(candidate.clone());
                Ok(candidate)
            })
            .await?;
        info!(id = candidate.id, name, "candidate added");
        Ok(candidate)
    }

    /// Removes the candidate and drops it from every group. Past draw records keep its name.
    pub async fn remove_candidate(&self, id: u64) -> Result<Candidate, String> {
        let removed = self
            .commit(|roster| {
                let index = roster
                    .candidates
                    .iter()
                    .position(|candidate| candidate.id == id)
                    .ok_or_else(|| format!("candidate not found: {}", id))?;
                let removed = roster.candidates.remove(index);
                for group in roster.groups.iter_mut() {
                    group.members.retain(|member| *member != id);
                }
                Ok(removed)
            })
            .await?;
        info!(id, name = %removed.name, "candidate removed");
        Ok(removed)
    }

    pub async fn record_grade(&self, id: u64, grade: f64) -> Result<Candidate, String> {
        if !grade.is_finite() {
            return Err(format!("invalid grade: {}", grade));
        }

        let updated = self
            .commit(|roster| {
                let candidate = roster
                    .candidates
                    .iter_mut()
                    .find(|candidate| candidate.id == id)
                    .ok_or_else(|| format!("candidate not found: {}", id))?;
                candidate.last_grade = Some(grade);
                Ok(candidate.clone())
            })
            .await?;
        info!(id, grade, "grade recorded");
        Ok(updated)
    }

    pub async fn add_group(&self, name: &str, members: &[u64]) -> Result<Group, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("group name must not be empty".to_string());
        }

        let group = self
            .commit(|roster| {
                if roster.find_group(name).is_some() {
                    return Err(format!("group already exists: {}", name));
                }
                let members = dedup_ids(members);
                select_group(&roster.candidates, &members).map_err(|err| err.to_string())?;

                let group = Group {
                    id: roster.next_group_id(),
                    name: name.to_string(),
                    members,
                };
                roster.groups.push(group.clone());
                Ok(group)
            })
            .await?;
        info!(group = group.id, name, members = group.members.len(), "group added");
        Ok(group)
    }

    /// Returns false when no group has that name.
    pub async fn remove_group(&self, name: &str) -> Result<bool, String> {
        let name = name.trim();
        let removed = self
            .commit(|roster| {
                let before = roster.groups.len();
                roster
                    .groups
                    .retain(|group| !group.name.eq_ignore_ascii_case(name));
                Ok(roster.groups.len() != before)
            })
            .await?;
        if removed {
            info!(name, "group removed");
        }
        Ok(removed)
    }

    /// Records a confirmed draw: bumps draw counts and prepends a history entry.
    /// Repeated ids count once. An empty id list changes nothing.
    pub async fn confirm_draw(&self, ids: &[u64]) -> Result<Option<DrawRecord>, String> {
        let ids = dedup_ids(ids);
        if ids.is_empty() {
            return Ok(None);
        }

        let record = self
            .commit(|roster| {
                let drawn = select_group(&roster.candidates, &ids).map_err(|err| err.to_string())?;

                let picked: HashSet<u64> = ids.iter().copied().collect();
                roster.candidates = apply_draw_history(&roster.candidates, &picked);

                let record = DrawRecord {
                    id: roster.next_record_id(),
                    drawn_at: current_timestamp(),
                    drawn: ids
                        .iter()
                        .filter_map(|id| drawn.iter().find(|candidate| candidate.id == *id))
                        .map(|candidate| DrawnEntry {
                            id: candidate.id,
                            name: candidate.name.clone(),
                        })
                        .collect(),
                };
                roster.history.insert(0, record.clone());
                roster.history.truncate(MAX_HISTORY);
                Ok(record)
            })
            .await?;
        info!(record = record.id, drawn = record.drawn.len(), "draw confirmed");
        Ok(Some(record))
    }

    pub async fn reset(&self) -> Result<(), String> {
        let count = self
            .commit(|roster| {
                roster.candidates = reset_history(&roster.candidates);
                roster.history.clear();
                Ok(roster.candidates.len())
            })
            .await?;
        info!(candidates = count, "roster history reset");
        Ok(())
    }

    /// Applies `change` to a copy of the roster; memory is only replaced once the copy is on disk.
    async fn commit<T, F>(&self, change: F) -> Result<T, String>
    where
        F: FnOnce(&mut Roster) -> Result<T, String>,
    {
        let mut guard = self.roster.write().await;
        let mut next = (*guard).clone();
        let value = change(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(value)
    }

    async fn persist(&self, roster: &Roster) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent).await?;
        }
        let payload = serde_json::to_string_pretty(roster)
            .map_err(|err| format!("failed to serialize roster: {}", err))?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, payload)
            .await
            .map_err(|err| format!("failed to write roster: {}", err))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|err| format!("failed to finalize roster: {}", err))?;
        Ok(())
    }
}

async fn ensure_dir(path: &Path) -> Result<(), String> {
    if path.as_os_str().is_empty() || path.exists() {
        return Ok(());
    }
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|err| format!("failed to create roster dir: {}", err))
}
