//! ScriptedAnswerAgent - canned answer generation.
//!
//! Routes queries to a small set of prepared answers by keyword, with
//! simulated generation latency. The VPN script asks back for
//! clarification; once a selection names Windows 11, a refined answer is
//! returned instead of the generic one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deskbot_core::error::Result;
use deskbot_core::generation::{
    Answer, AnswerGenerator, AnswerKind, ClarificationContext, ClarificationRequest,
};
use deskbot_core::search::Source;
use rand::Rng;
use std::time::Duration;
use uuid::Uuid;

/// Clarification option labels offered by the VPN script.
pub const OPTION_OS: &str = "Operating system";
pub const OPTION_NETWORK_SEGMENT: &str = "Network segment";
pub const OPTION_CLIENT_VERSION: &str = "VPN client version";

/// Selection value that switches the VPN script to its refined answer.
pub const WINDOWS_11: &str = "Windows 11";

const LATENCY_MIN_MS: u64 = 800;
const LATENCY_MAX_MS: u64 = 1200;

/// Which prepared answer a query maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnswerScript {
    AdDomain,
    Vpn,
    Zabbix,
    GeneralTriage,
}

/// Agent that generates answers from prepared scripts.
#[derive(Clone)]
pub struct ScriptedAnswerAgent {
    simulate_latency: bool,
}

impl Default for ScriptedAnswerAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedAnswerAgent {
    /// Creates an agent with latency simulation enabled.
    pub fn new() -> Self {
        Self {
            simulate_latency: true,
        }
    }

    /// Enables or disables the simulated generation delay.
    pub fn with_latency(mut self, enabled: bool) -> Self {
        self.simulate_latency = enabled;
        self
    }

    fn route(query: &str) -> AnswerScript {
        let lower = query.to_lowercase();
        if lower.contains("vpn") {
            AnswerScript::Vpn
        } else if lower.contains("ad") || lower.contains("domain") {
            AnswerScript::AdDomain
        } else if lower.contains("zabbix") {
            AnswerScript::Zabbix
        } else {
            AnswerScript::GeneralTriage
        }
    }

    async fn generation_delay(&self) -> u64 {
        let latency_ms = rand::thread_rng().gen_range(LATENCY_MIN_MS..=LATENCY_MAX_MS);
        if self.simulate_latency {
            tokio::time::sleep(Duration::from_millis(latency_ms)).await;
        }
        latency_ms
    }

    fn scripted_answer(script: AnswerScript, latency_ms: u64) -> Answer {
        match script {
            AnswerScript::AdDomain => Answer {
                answer_id: Uuid::new_v4().to_string(),
                kind: AnswerKind::Checklist,
                steps: vec![
                    "Check network connectivity to the domain controller".to_string(),
                    "Run `nltest /dclist:domain.local` to list available controllers".to_string(),
                    "Flush the DNS cache with `ipconfig /flushdns`".to_string(),
                    "Restart the Netlogon service".to_string(),
                    "If the trust relationship is broken, re-join the machine to the domain"
                        .to_string(),
                ],
                sources: vec![source(
                    "AD: troubleshooting domain login issues",
                    "ITKB",
                    "https://kb.example.com/itkb/ad-troubleshooting",
                    Some("netlogon-service"),
                    "Common causes of domain authentication failures and how to isolate them.",
                    "2025-07-14T09:30:00Z",
                )],
                confidence: 0.85,
                latency_ms,
                clarification: None,
            },
            AnswerScript::Vpn => Answer {
                answer_id: Uuid::new_v4().to_string(),
                kind: AnswerKind::Steps,
                steps: vec![
                    "Verify the VPN client version is up to date".to_string(),
                    "Check that the corporate gateway is reachable (ping vpn.corp.example.com)"
                        .to_string(),
                    "Re-import the connection profile".to_string(),
                    "Inspect the client log for TLS handshake errors".to_string(),
                    "Try another network to rule out the local segment".to_string(),
                ],
                sources: vec![
                    source(
                        "VPN client setup and profiles",
                        "ITKB",
                        "https://kb.example.com/itkb/vpn-client-setup",
                        Some("setup-windows"),
                        "Installing the corporate VPN client and importing connection profiles.",
                        "2025-08-02T11:00:00Z",
                    ),
                    source(
                        "VPN diagnostics playbook",
                        "ITKB",
                        "https://kb.example.com/itkb/vpn-diagnostics",
                        None,
                        "Step-by-step diagnostics for unstable VPN tunnels.",
                        "2025-07-28T16:45:00Z",
                    ),
                ],
                confidence: 0.62,
                latency_ms,
                clarification: Some(ClarificationRequest {
                    options: vec![
                        OPTION_OS.to_string(),
                        OPTION_NETWORK_SEGMENT.to_string(),
                        OPTION_CLIENT_VERSION.to_string(),
                    ],
                }),
            },
            AnswerScript::Zabbix => Answer {
                answer_id: Uuid::new_v4().to_string(),
                kind: AnswerKind::Checklist,
                steps: vec![
                    "Check the zabbix-agent2 service status on the host".to_string(),
                    "Verify the Server= line in zabbix_agent2.conf points at the current proxy"
                        .to_string(),
                    "Make sure port 10050 is open towards the monitoring segment".to_string(),
                    "Restart the agent and watch the proxy queue".to_string(),
                ],
                sources: vec![restricted_source(
                    "Zabbix: agent connectivity reference",
                    "MON",
                    "https://kb.example.com/mon/zabbix-agents",
                    Some("agent-config"),
                    "Agent-side settings required to report into the monitoring cluster.",
                    "2025-08-10T08:15:00Z",
                )],
                confidence: 0.78,
                latency_ms,
                clarification: None,
            },
            AnswerScript::GeneralTriage => Answer {
                answer_id: Uuid::new_v4().to_string(),
                kind: AnswerKind::Checklist,
                steps: vec![
                    "Restart the affected application or service".to_string(),
                    "Collect the exact error text and a screenshot".to_string(),
                    "Check whether colleagues on the same segment are affected".to_string(),
                    "If the issue persists, escalate with the collected details".to_string(),
                ],
                sources: Vec::new(),
                confidence: 0.5,
                latency_ms,
                clarification: None,
            },
        }
    }

    fn refined_windows11_answer(latency_ms: u64) -> Answer {
        Answer {
            answer_id: Uuid::new_v4().to_string(),
            kind: AnswerKind::Steps,
            steps: vec![
                "Update the VPN client to the Windows 11 compatible build (5.2 or later)"
                    .to_string(),
                "Disable the 'Randomize MAC address' option for the corporate adapter".to_string(),
                "Re-create the VPN profile after the client update".to_string(),
                "Check Credential Guard settings; legacy IKEv2 profiles conflict with it"
                    .to_string(),
                "Reboot and keep the tunnel up for at least 15 minutes to confirm".to_string(),
            ],
            sources: vec![source(
                "VPN on Windows 11: known issues",
                "ITKB",
                "https://kb.example.com/itkb/vpn-windows11",
                None,
                "Client incompatibilities and fixes specific to Windows 11 hosts.",
                "2025-08-12T10:05:00Z",
            )],
            confidence: 0.92,
            latency_ms,
            clarification: None,
        }
    }
}

#[async_trait]
impl AnswerGenerator for ScriptedAnswerAgent {
    async fn ask(&self, query: &str, context: Option<&ClarificationContext>) -> Result<Answer> {
        let latency_ms = self.generation_delay().await;

        if let Some(context) = context {
            if context.selected_options.values().any(|v| v == WINDOWS_11) {
                tracing::debug!(target: "answer_agent", "returning refined Windows 11 answer");
                return Ok(Self::refined_windows11_answer(latency_ms));
            }
        }

        Ok(Self::scripted_answer(Self::route(query), latency_ms))
    }
}

fn source(
    title: &str,
    space: &str,
    url: &str,
    anchor: Option<&str>,
    snippet: &str,
    updated_at: &str,
) -> Source {
    Source {
        title: title.to_string(),
        space: space.to_string(),
        url: url.to_string(),
        anchor: anchor.map(str::to_string),
        snippet: snippet.to_string(),
        updated_at: doc_timestamp(updated_at),
        accessible: true,
    }
}

fn restricted_source(
    title: &str,
    space: &str,
    url: &str,
    anchor: Option<&str>,
    snippet: &str,
    updated_at: &str,
) -> Source {
    Source {
        accessible: false,
        ..source(title, space, url, anchor, snippet, updated_at)
    }
}

fn doc_timestamp(value: &str) -> DateTime<Utc> {
    value.parse().unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn agent() -> ScriptedAnswerAgent {
        ScriptedAnswerAgent::new().with_latency(false)
    }

    #[tokio::test]
    async fn test_vpn_queries_request_clarification() {
        let answer = agent().ask("VPN drops every hour", None).await.unwrap();
        assert!(answer.needs_clarification());
        let options = answer.clarification.unwrap().options;
        assert_eq!(options.len(), 3);
        assert!(options.contains(&OPTION_OS.to_string()));
        assert_eq!(answer.kind, AnswerKind::Steps);
    }

    #[tokio::test]
    async fn test_domain_queries_return_ad_checklist() {
        let answer = agent().ask("cannot log in to the domain", None).await.unwrap();
        assert!(!answer.needs_clarification());
        assert_eq!(answer.kind, AnswerKind::Checklist);
        assert_eq!(answer.sources.len(), 1);
        assert_eq!(answer.sources[0].space, "ITKB");
        assert!(answer.confidence > 0.8);
    }

    #[tokio::test]
    async fn test_zabbix_source_is_restricted() {
        let answer = agent().ask("zabbix agent offline", None).await.unwrap();
        assert_eq!(answer.sources.len(), 1);
        assert!(!answer.sources[0].accessible);
        assert_eq!(answer.sources[0].space, "MON");
    }

    #[tokio::test]
    async fn test_unknown_queries_get_generic_triage() {
        let answer = agent().ask("printer smells funny", None).await.unwrap();
        assert!(answer.sources.is_empty());
        assert!(!answer.needs_clarification());
    }

    #[tokio::test]
    async fn test_windows11_selection_switches_to_refined_answer() {
        let mut selected = BTreeMap::new();
        selected.insert(OPTION_OS.to_string(), WINDOWS_11.to_string());
        selected.insert(OPTION_NETWORK_SEGMENT.to_string(), "Office LAN".to_string());
        let context = ClarificationContext {
            original_query: "vpn drops every hour".to_string(),
            selected_options: selected,
            remaining_questions: 0,
        };

        let answer = agent()
            .ask("vpn drops every hour", Some(&context))
            .await
            .unwrap();

        assert!(!answer.needs_clarification());
        assert!(answer.confidence > 0.9);
        assert!(answer.steps[0].contains("Windows 11"));
    }

    #[tokio::test]
    async fn test_context_without_windows11_keeps_scripted_answer() {
        let mut selected = BTreeMap::new();
        selected.insert(OPTION_OS.to_string(), "Ubuntu 24.04".to_string());
        selected.insert(OPTION_NETWORK_SEGMENT.to_string(), "Home".to_string());
        let context = ClarificationContext {
            original_query: "vpn drops every hour".to_string(),
            selected_options: selected,
            remaining_questions: 0,
        };

        let answer = agent()
            .ask("vpn drops every hour", Some(&context))
            .await
            .unwrap();

        // The script still flags clarification; terminality is the
        // orchestrator's call when a context was supplied.
        assert!(answer.needs_clarification());
        assert!(answer.confidence < 0.7);
    }
}
