//! Integration catalog for the integrations view.

use serde::Serialize;

use flowdeck_models::Integration;

/// An integration that is advertised but cannot be connected yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpcomingIntegration {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

pub static UPCOMING_INTEGRATIONS: &[UpcomingIntegration] = &[
    UpcomingIntegration {
        id: "jira",
        name: "Jira",
        category: "project-management",
        icon: "🎯",
        description: "Connect your Jira projects for enhanced task management",
    },
    UpcomingIntegration {
        id: "trello",
        name: "Trello",
        category: "kanban",
        icon: "📋",
        description: "Sync your Trello boards with your productivity workflow",
    },
    UpcomingIntegration {
        id: "asana",
        name: "Asana",
        category: "project-management",
        icon: "✅",
        description: "Import tasks and projects from Asana",
    },
];

/// Store integrations split by connection state, each in collection order.
#[derive(Debug, Clone, Default)]
pub struct IntegrationPartition<'a> {
    pub connected: Vec<&'a Integration>,
    pub available: Vec<&'a Integration>,
}

impl<'a> IntegrationPartition<'a> {
    pub fn of(integrations: &'a [Integration]) -> Self {
        let (connected, available): (Vec<_>, Vec<_>) =
            integrations.iter().partition(|i| i.connected);
        Self {
            connected,
            available,
        }
    }
}

/// Prompt shown on a disconnected integration's card.
pub fn connect_prompt(integration: &Integration) -> String {
    format!(
        "Connect {} to sync your {}",
        integration.name,
        integration.kind.sync_target()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use flowdeck_models::seed_integrations;

    #[test]
    fn test_partition_on_seed() {
        let integrations = seed_integrations(Utc::now());
        let partition = IntegrationPartition::of(&integrations);

        let connected: Vec<&str> = partition.connected.iter().map(|i| i.id.as_str()).collect();
        let available: Vec<&str> = partition.available.iter().map(|i| i.id.as_str()).collect();

        assert_eq!(connected, vec!["github", "slack", "calendar"]);
        assert_eq!(available, vec!["notion"]);
    }

    #[test]
    fn test_connect_prompt() {
        let integrations = seed_integrations(Utc::now());
        assert_eq!(
            connect_prompt(&integrations[2]),
            "Connect Notion to sync your databases"
        );
    }

    #[test]
    fn test_upcoming_ids_do_not_clash_with_seed() {
        let integrations = seed_integrations(Utc::now());
        for upcoming in UPCOMING_INTEGRATIONS {
            assert!(integrations.iter().all(|i| i.id != upcoming.id));
        }
    }
}
