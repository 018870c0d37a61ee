//! Supported object kinds

use super::endpoint::Endpoint;
use super::filter::OperatorStyle;
use crate::types::ApiVersion;
use std::fmt;
use std::str::FromStr;

/// Channel types requested from the conversations endpoint
pub const CONVERSATION_CHANNEL_TYPES: &str = "E,B,M,I,C,W,F,A,T,Q,S";

const AGENT_REPORT_COLUMNS: &str = "id,contactid,firstname,lastname,worktime,answers,answers_ph,\
newAnswerAvgTime,newAnswerAvgTimeSla,nextAnswerAvgTime,nextAnswerAvgTimeSla,calls,calls_ph,\
missed_calls,missed_calls_ph,call_seconds,call_seconds_ph,chats,chats_ph,chat_answers,\
chat_answers_ph,missed_chats,missed_chats_ph,chat_pickup,chatPickupAvgTime,chatAvgTime,not_ranked,\
not_ranked_p,not_ranked_ph,rewards,rewards_p,rewards_ph,punishments,punishments_p,punishments_ph,\
created_tickets,resolved_tickets,u_chats,u_calls,notes,firstAssignAvgTime,firstAssignAvgTimeSla,\
firstResolveAvgTime,firstResolveAvgTimeSla,calls_outgoing,call_outgoing_seconds,\
call_outgoing_avg_time,call_pickup_avg_time,call_avg_time,calls_internal,call_internal_avg_time,\
call_internal_seconds,o_calls";

const RANKING_COLUMNS: &str = "id,rankingType,datecreated,conversationid,agentcontactid,agentEmail,\
agent,contactid,requesterEmail,requester,comment";

const AVAILABILITY_COLUMNS: &str =
    "id,userid,firstname,lastname,contactid,departmentid,department_name,hours_online,from_date,to_date";

/// Date filter applied to a v3 collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFilter {
    pub field: &'static str,
    pub style: OperatorStyle,
}

impl DateFilter {
    const fn plain(field: &'static str) -> Self {
        Self {
            field,
            style: OperatorStyle::Plain,
        }
    }
}

/// An object the extractor can download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Agents,
    Calls,
    Chats,
    Companies,
    Contacts,
    Departments,
    Tags,
    Tickets,
    TicketsMessages,
    TicketsHistory,
    AgentReport,
    RankingAgentsReport,
    AgentAvailability,
    AgentAvailabilityChats,
    CallsAvailability,
    Conversations,
}

impl ObjectKind {
    /// Every supported object, v3 first
    pub fn all() -> &'static [ObjectKind] {
        use ObjectKind::*;
        &[
            Agents,
            Calls,
            Chats,
            Companies,
            Contacts,
            Departments,
            Tags,
            Tickets,
            TicketsMessages,
            TicketsHistory,
            AgentReport,
            RankingAgentsReport,
            AgentAvailability,
            AgentAvailabilityChats,
            CallsAvailability,
            Conversations,
        ]
    }

    /// Configuration name of the object
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Agents => "agents",
            ObjectKind::Calls => "calls",
            ObjectKind::Chats => "chats",
            ObjectKind::Companies => "companies",
            ObjectKind::Contacts => "contacts",
            ObjectKind::Departments => "departments",
            ObjectKind::Tags => "tags",
            ObjectKind::Tickets => "tickets",
            ObjectKind::TicketsMessages => "tickets_messages",
            ObjectKind::TicketsHistory => "tickets_history",
            ObjectKind::AgentReport => "agent_report",
            ObjectKind::RankingAgentsReport => "ranking_agents_report",
            ObjectKind::AgentAvailability => "agent_availability",
            ObjectKind::AgentAvailabilityChats => "agent_availability_chats",
            ObjectKind::CallsAvailability => "calls_availability",
            ObjectKind::Conversations => "conversations",
        }
    }

    pub fn api_version(self) -> ApiVersion {
        match self {
            ObjectKind::AgentReport
            | ObjectKind::RankingAgentsReport
            | ObjectKind::AgentAvailability
            | ObjectKind::AgentAvailabilityChats
            | ObjectKind::CallsAvailability
            | ObjectKind::Conversations => ApiVersion::V1,
            _ => ApiVersion::V3,
        }
    }

    /// v1 objects authenticate with the separate v1 key
    pub fn requires_v1_token(self) -> bool {
        self.api_version() == ApiVersion::V1
    }

    /// Reports fetched once per day of the window
    pub fn is_daily_report(self) -> bool {
        self.api_version() == ApiVersion::V1 && self != ObjectKind::Conversations
    }

    /// Endpoint of the object.
    ///
    /// Ticket messages hang off a ticket, see [`ticket_messages_endpoint`].
    pub fn endpoint(self) -> Endpoint {
        match self {
            ObjectKind::Agents => Endpoint::page("v3/agents"),
            ObjectKind::Calls => Endpoint::cursor("v3/calls"),
            ObjectKind::Chats => Endpoint::page("v3/chats"),
            ObjectKind::Companies => Endpoint::page("v3/companies"),
            ObjectKind::Contacts => Endpoint::page("v3/contacts"),
            ObjectKind::Departments => Endpoint::page("v3/departments"),
            ObjectKind::Tags => Endpoint::page("v3/tags"),
            ObjectKind::Tickets | ObjectKind::TicketsMessages => Endpoint::page("v3/tickets"),
            ObjectKind::TicketsHistory => Endpoint::cursor("v3/tickets/history"),
            ObjectKind::AgentReport => Endpoint::limit("reports/agents", "agents"),
            ObjectKind::RankingAgentsReport => Endpoint::limit("reports/ranking", "ranks"),
            ObjectKind::AgentAvailability => {
                Endpoint::limit("reports/tickets/agentsavailability", "agentsavailability")
            }
            ObjectKind::AgentAvailabilityChats => {
                Endpoint::limit("reports/chats/agentsavailability", "agentsavailability")
            }
            ObjectKind::CallsAvailability => {
                Endpoint::limit("reports/calls/availability", "availability")
            }
            ObjectKind::Conversations => Endpoint::limit("conversations", "conversations")
                .with_limit_params("limit", "offset"),
        }
    }

    /// Date filter of the object's v3 collection
    pub fn date_filter(self) -> Option<DateFilter> {
        match self {
            ObjectKind::Calls => Some(DateFilter::plain("dateCreated")),
            ObjectKind::Chats => Some(DateFilter::plain("date_created")),
            ObjectKind::Companies | ObjectKind::Contacts => Some(DateFilter::plain("datechanged")),
            ObjectKind::Tickets => Some(DateFilter {
                field: "date_changed",
                style: OperatorStyle::Date,
            }),
            ObjectKind::TicketsMessages => Some(DateFilter::plain("datecreated")),
            ObjectKind::TicketsHistory => Some(DateFilter::plain("date_from")),
            _ => None,
        }
    }

    /// Fixed `columns` list requested from a v1 report
    pub fn report_columns(self) -> Option<&'static str> {
        match self {
            ObjectKind::AgentReport => Some(AGENT_REPORT_COLUMNS),
            ObjectKind::RankingAgentsReport => Some(RANKING_COLUMNS),
            ObjectKind::AgentAvailability | ObjectKind::AgentAvailabilityChats => {
                Some(AVAILABILITY_COLUMNS)
            }
            _ => None,
        }
    }

    /// Names of every supported object
    pub fn supported_names() -> Vec<String> {
        Self::all().iter().map(|k| k.name().to_string()).collect()
    }
}

/// Messages endpoint of one ticket; the id is encoded as a single path segment
pub fn ticket_messages_endpoint(ticket_id: &str) -> Endpoint {
    Endpoint::page(format!(
        "v3/tickets/{}/messages",
        urlencoding::encode(ticket_id)
    ))
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| s.to_string())
    }
}
