//! KnowledgeSearchAgent - corpus-backed source retrieval.
//!
//! Serves a small fixed document corpus with keyword matching and
//! per-space access control: restricted spaces are only readable by
//! admins. The same agent reports index freshness per space.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use deskbot_core::error::{DeskbotError, Result};
use deskbot_core::search::{
    IndexStatus, IndexStatusProvider, SearchFilters, Source, SourceRetriever, SpaceStatus,
};
use deskbot_core::session::UserRole;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Space readable by everyone; all other spaces require the admin role.
pub const OPEN_SPACE: &str = "ITKB";

const RESULT_LIMIT: usize = 5;
const SEARCH_LATENCY_MS: u64 = 200;

struct CorpusDoc {
    title: &'static str,
    space: &'static str,
    url: &'static str,
    anchor: Option<&'static str>,
    snippet: &'static str,
    updated_at: &'static str,
}

static CORPUS: Lazy<Vec<CorpusDoc>> = Lazy::new(|| {
    vec![
        CorpusDoc {
            title: "VPN client setup and profiles",
            space: "ITKB",
            url: "https://kb.example.com/itkb/vpn-client-setup",
            anchor: Some("setup-windows"),
            snippet: "Installing the corporate VPN client and importing connection profiles.",
            updated_at: "2025-08-02T11:00:00Z",
        },
        CorpusDoc {
            title: "AD: troubleshooting domain login issues",
            space: "ITKB",
            url: "https://kb.example.com/itkb/ad-troubleshooting",
            anchor: Some("netlogon-service"),
            snippet: "Common causes of domain authentication failures and how to isolate them.",
            updated_at: "2025-07-14T09:30:00Z",
        },
        CorpusDoc {
            title: "VPN diagnostics playbook",
            space: "ITKB",
            url: "https://kb.example.com/itkb/vpn-diagnostics",
            anchor: None,
            snippet: "Step-by-step diagnostics for unstable VPN tunnels.",
            updated_at: "2025-07-28T16:45:00Z",
        },
        CorpusDoc {
            title: "Zabbix: agent connectivity reference",
            space: "MON",
            url: "https://kb.example.com/mon/zabbix-agents",
            anchor: Some("agent-config"),
            snippet: "Agent-side settings required to report into the monitoring cluster.",
            updated_at: "2025-08-10T08:15:00Z",
        },
        CorpusDoc {
            title: "Infrastructure monitoring overview",
            space: "MON",
            url: "https://kb.example.com/mon/monitoring-overview",
            anchor: None,
            snippet: "Dashboards, alert routing, and escalation paths for infrastructure alerts.",
            updated_at: "2025-06-30T13:20:00Z",
        },
        CorpusDoc {
            title: "AD: password reset via PowerShell",
            space: "ITKB",
            url: "https://kb.example.com/itkb/ad-password-reset",
            anchor: Some("powershell-reset"),
            snippet: "Resetting domain passwords with Set-ADAccountPassword.",
            updated_at: "2025-07-21T10:10:00Z",
        },
    ]
});

/// Agent serving the scripted knowledge corpus.
#[derive(Clone)]
pub struct KnowledgeSearchAgent {
    simulate_latency: bool,
    spaces: Arc<Mutex<Vec<SpaceStatus>>>,
}

impl Default for KnowledgeSearchAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeSearchAgent {
    /// Creates an agent with latency simulation enabled.
    pub fn new() -> Self {
        let now = Utc::now();
        let spaces = vec![
            SpaceStatus {
                key: "ITKB".to_string(),
                name: "IT Knowledge Base".to_string(),
                last_updated_at: now - ChronoDuration::hours(2),
                docs: 156,
                errors: 0,
            },
            SpaceStatus {
                key: "MON".to_string(),
                name: "Monitoring".to_string(),
                last_updated_at: now - ChronoDuration::minutes(45),
                docs: 89,
                errors: 2,
            },
        ];
        Self {
            simulate_latency: true,
            spaces: Arc::new(Mutex::new(spaces)),
        }
    }

    /// Enables or disables the simulated retrieval delay.
    pub fn with_latency(mut self, enabled: bool) -> Self {
        self.simulate_latency = enabled;
        self
    }

    fn is_accessible(space: &str, role: UserRole) -> bool {
        role == UserRole::Admin || space == OPEN_SPACE
    }
}

#[async_trait]
impl SourceRetriever for KnowledgeSearchAgent {
    async fn search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<Source>> {
        if self.simulate_latency {
            tokio::time::sleep(Duration::from_millis(SEARCH_LATENCY_MS)).await;
        }

        let keywords: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let sources = CORPUS
            .iter()
            .filter(|doc| {
                let haystack = format!("{} {}", doc.title, doc.snippet).to_lowercase();
                keywords.iter().any(|k| haystack.contains(k))
            })
            .filter(|doc| match &filters.spaces {
                Some(spaces) => spaces.iter().any(|s| s == doc.space),
                None => true,
            })
            .take(RESULT_LIMIT)
            .map(|doc| Source {
                title: doc.title.to_string(),
                space: doc.space.to_string(),
                url: doc.url.to_string(),
                anchor: doc.anchor.map(str::to_string),
                snippet: doc.snippet.to_string(),
                updated_at: doc.updated_at.parse().unwrap_or_else(|_| Utc::now()),
                accessible: Self::is_accessible(doc.space, filters.role),
            })
            .collect();

        Ok(sources)
    }
}

#[async_trait]
impl IndexStatusProvider for KnowledgeSearchAgent {
    async fn status(&self) -> Result<IndexStatus> {
        let spaces = self.spaces.lock().await.clone();
        let last_global_update_at = spaces
            .iter()
            .map(|s| s.last_updated_at)
            .min()
            .unwrap_or_else(Utc::now);
        Ok(IndexStatus {
            spaces,
            last_global_update_at,
        })
    }

    async fn reindex(&self, space_key: &str) -> Result<()> {
        let mut spaces = self.spaces.lock().await;
        let space = spaces
            .iter_mut()
            .find(|s| s.key == space_key)
            .ok_or_else(|| DeskbotError::not_found("space", space_key))?;
        space.last_updated_at = Utc::now();
        space.docs += 1;
        space.errors = 0;
        tracing::info!(target: "search_agent", space = space_key, "reindex completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> KnowledgeSearchAgent {
        KnowledgeSearchAgent::new().with_latency(false)
    }

    #[tokio::test]
    async fn test_keyword_match_on_title_and_snippet() {
        let sources = agent()
            .search("vpn profile", &SearchFilters::for_role(UserRole::User))
            .await
            .unwrap();

        assert!(!sources.is_empty());
        assert!(sources.iter().all(|s| {
            let haystack = format!("{} {}", s.title, s.snippet).to_lowercase();
            haystack.contains("vpn") || haystack.contains("profile")
        }));
    }

    #[tokio::test]
    async fn test_restricted_space_is_inaccessible_to_users() {
        let sources = agent()
            .search("zabbix agent", &SearchFilters::for_role(UserRole::User))
            .await
            .unwrap();

        let mon: Vec<_> = sources.iter().filter(|s| s.space == "MON").collect();
        assert!(!mon.is_empty());
        assert!(mon.iter().all(|s| !s.accessible));
    }

    #[tokio::test]
    async fn test_admins_see_every_space() {
        let sources = agent()
            .search("monitoring", &SearchFilters::for_role(UserRole::Admin))
            .await
            .unwrap();

        assert!(sources.iter().all(|s| s.accessible));
    }

    #[tokio::test]
    async fn test_space_filter_and_result_limit() {
        let filters = SearchFilters {
            role: UserRole::Admin,
            spaces: Some(vec!["ITKB".to_string()]),
        };
        let sources = agent().search("ad vpn monitoring", &filters).await.unwrap();

        assert!(sources.len() <= RESULT_LIMIT);
        assert!(sources.iter().all(|s| s.space == "ITKB"));
    }

    #[tokio::test]
    async fn test_blank_query_returns_nothing() {
        let sources = agent()
            .search("   ", &SearchFilters::for_role(UserRole::User))
            .await
            .unwrap();
        assert!(sources.is_empty());
    }

    #[tokio::test]
    async fn test_reindex_refreshes_known_space() {
        let agent = agent();
        let before = agent.status().await.unwrap();
        let mon_before = before.spaces.iter().find(|s| s.key == "MON").unwrap().clone();

        agent.reindex("MON").await.unwrap();

        let after = agent.status().await.unwrap();
        let mon_after = after.spaces.iter().find(|s| s.key == "MON").unwrap();
        assert!(mon_after.last_updated_at > mon_before.last_updated_at);
        assert_eq!(mon_after.docs, mon_before.docs + 1);
        assert_eq!(mon_after.errors, 0);
    }

    #[tokio::test]
    async fn test_reindex_unknown_space_is_not_found() {
        let err = agent().reindex("NOPE").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_global_update_tracks_stalest_space() {
        let status = agent().status().await.unwrap();
        let oldest = status.spaces.iter().map(|s| s.last_updated_at).min().unwrap();
        assert_eq!(status.last_global_update_at, oldest);
    }
}
