//! Output table registry

use std::fmt;

/// Column layout of one output table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    /// Table name, also the CSV file stem
    pub name: &'static str,
    /// Keys read from the flattened record, in output order
    pub source_fields: &'static [&'static str],
    /// Column names declared in the manifest, parallel to `source_fields`
    pub columns: &'static [&'static str],
    /// Fields written as JSON text
    pub json_fields: &'static [&'static str],
    /// Primary key columns
    pub primary_key: &'static [&'static str],
}

/// Every table the extractor writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableId {
    Agents,
    Calls,
    Chats,
    Companies,
    Contacts,
    Departments,
    Tags,
    Tickets,
    TicketsMessages,
    TicketsMessagesContent,
    TicketsHistory,
    AgentReport,
    RankingAgentsReport,
    AgentAvailability,
    AgentAvailabilityChats,
    CallsAvailability,
    Conversations,
}

impl TableId {
    pub fn all() -> &'static [TableId] {
        use TableId::*;
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
            TicketsMessagesContent,
            TicketsHistory,
            AgentReport,
            RankingAgentsReport,
            AgentAvailability,
            AgentAvailabilityChats,
            CallsAvailability,
            Conversations,
        ]
    }

    pub fn schema(self) -> &'static TableSchema {
        match self {
            TableId::Agents => &AGENTS,
            TableId::Calls => &CALLS,
            TableId::Chats => &CHATS,
            TableId::Companies => &COMPANIES,
            TableId::Contacts => &CONTACTS,
            TableId::Departments => &DEPARTMENTS,
            TableId::Tags => &TAGS,
            TableId::Tickets => &TICKETS,
            TableId::TicketsMessages => &TICKETS_MESSAGES,
            TableId::TicketsMessagesContent => &TICKETS_MESSAGES_CONTENT,
            TableId::TicketsHistory => &TICKETS_HISTORY,
            TableId::AgentReport => &AGENT_REPORT,
            TableId::RankingAgentsReport => &RANKING_AGENTS_REPORT,
            TableId::AgentAvailability => &AGENT_AVAILABILITY,
            TableId::AgentAvailabilityChats => &AGENT_AVAILABILITY_CHATS,
            TableId::CallsAvailability => &CALLS_AVAILABILITY,
            TableId::Conversations => &CONVERSATIONS,
        }
    }

    pub fn name(self) -> &'static str {
        self.schema().name
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// v3 tables
// ============================================================================

const AGENTS_FIELDS: &[&str] = &[
    "id",
    "name",
    "email",
    "role",
    "avatar_url",
    "online_status",
    "status",
    "gender",
];

static AGENTS: TableSchema = TableSchema {
    name: "agents",
    source_fields: AGENTS_FIELDS,
    columns: AGENTS_FIELDS,
    json_fields: &[],
    primary_key: &["id"],
};

static CALLS: TableSchema = TableSchema {
    name: "calls",
    source_fields: &[
        "id",
        "ticketId",
        "type",
        "fromNumber",
        "fromName",
        "toNumber",
        "toName",
        "viaNumber",
        "dateCreated",
        "dateAnswered",
        "dateFinished",
        "callDuration",
    ],
    columns: &[
        "id",
        "ticket_id",
        "type",
        "from_number",
        "from_name",
        "to_number",
        "to_name",
        "via_number",
        "date_created",
        "date_answered",
        "date_finished",
        "call_duration",
    ],
    json_fields: &[],
    primary_key: &["id"],
};

static CHATS: TableSchema = TableSchema {
    name: "chats",
    source_fields: &[
        "id",
        "subject",
        "preview",
        "date_created",
        "chat_order",
        "status_date_started",
        "tags",
        "rstatus",
        "firstname",
        "lastname",
        "system_name",
        "avatar_url",
        "countrycode",
        "city",
        "departmentId",
        "agentId",
        "status",
        "emails",
    ],
    columns: &[
        "id",
        "subject",
        "preview",
        "date_created",
        "chat_order",
        "status_date_started",
        "tags",
        "rstatus",
        "first_name",
        "last_name",
        "system_name",
        "avatar_url",
        "country_code",
        "city",
        "department_id",
        "agent_id",
        "status",
        "emails",
    ],
    json_fields: &["tags", "emails"],
    primary_key: &["id"],
};

static COMPANIES: TableSchema = TableSchema {
    name: "companies",
    source_fields: &[
        "id",
        "name",
        "system_name",
        "description",
        "avatar_url",
        "type",
        "date_created",
        "date_changed",
        "language",
        "city",
        "countrycode",
        "ip",
        "emails",
        "phones",
        "groups",
    ],
    columns: &[
        "id",
        "name",
        "system_name",
        "description",
        "avatar_url",
        "type",
        "date_created",
        "date_changed",
        "language",
        "city",
        "country_code",
        "ip",
        "emails",
        "phones",
        "groups",
    ],
    json_fields: &["emails", "phones", "groups"],
    primary_key: &["id"],
};

static CONTACTS: TableSchema = TableSchema {
    name: "contacts",
    source_fields: &[
        "id",
        "company_id",
        "firstname",
        "lastname",
        "system_name",
        "description",
        "avatar_url",
        "gender",
        "language",
        "city",
        "countrycode",
        "ip",
        "emails",
        "phones",
        "groups",
        "custom_fields",
        "type",
        "date_created",
        "date_changed",
    ],
    columns: &[
        "id",
        "company_id",
        "first_name",
        "last_name",
        "system_name",
        "description",
        "avatar_url",
        "gender",
        "language",
        "city",
        "country_code",
        "ip",
        "emails",
        "phones",
        "groups",
        "custom_fields",
        "type",
        "date_created",
        "date_changed",
    ],
    json_fields: &["emails", "phones", "groups", "custom_fields"],
    primary_key: &["id"],
};

const DEPARTMENTS_FIELDS: &[&str] = &[
    "department_id",
    "agent_count",
    "name",
    "online_status",
    "agent_ids",
    "mailaccount_id",
];

static DEPARTMENTS: TableSchema = TableSchema {
    name: "departments",
    source_fields: DEPARTMENTS_FIELDS,
    columns: DEPARTMENTS_FIELDS,
    json_fields: &["agent_ids"],
    primary_key: &["department_id"],
};

const TAGS_FIELDS: &[&str] = &["id", "name", "color", "background_color", "is_public"];

static TAGS: TableSchema = TableSchema {
    name: "tags",
    source_fields: TAGS_FIELDS,
    columns: TAGS_FIELDS,
    json_fields: &[],
    primary_key: &["id"],
};

static TICKETS: TableSchema = TableSchema {
    name: "tickets",
    source_fields: &[
        "id",
        "owner_contactid",
        "owner_email",
        "owner_name",
        "departmentid",
        "agentid",
        "status",
        "tags",
        "code",
        "channel_type",
        "date_created",
        "date_changed",
        "date_resolved",
        "date_due",
        "date_deleted",
        "last_activity",
        "last_activity_public",
        "public_access_urlcode",
        "subject",
        "custom_fields",
    ],
    columns: &[
        "id",
        "owner_contact_id",
        "owner_email",
        "owner_name",
        "department_id",
        "agent_id",
        "status",
        "tags",
        "code",
        "channel_type",
        "date_created",
        "date_changed",
        "date_resolved",
        "date_due",
        "date_deleted",
        "last_activity",
        "last_activity_public",
        "public_access_urlcode",
        "subject",
        "custom_fields",
    ],
    json_fields: &["tags", "custom_fields"],
    primary_key: &["id"],
};

static TICKETS_MESSAGES: TableSchema = TableSchema {
    name: "tickets_messages",
    source_fields: &[
        "id",
        "parent_id",
        "ticket_id",
        "userid",
        "user_full_name",
        "type",
        "status",
        "datecreated",
        "datefinished",
        "sort_order",
        "mail_msg_id",
        "pop3_msg_id",
    ],
    columns: &[
        "id",
        "parent_id",
        "ticket_id",
        "user_id",
        "user_full_name",
        "type",
        "status",
        "date_created",
        "date_finished",
        "sort_order",
        "mail_msg_id",
        "pop3_msg_id",
    ],
    json_fields: &[],
    primary_key: &["id", "ticket_id"],
};

static TICKETS_MESSAGES_CONTENT: TableSchema = TableSchema {
    name: "tickets_messages_content",
    source_fields: &[
        "id",
        "message_id",
        "userid",
        "type",
        "datecreated",
        "format",
        "message",
        "visibility",
    ],
    columns: &[
        "id",
        "message_id",
        "user_id",
        "type",
        "date_created",
        "format",
        "message",
        "visibility",
    ],
    json_fields: &[],
    primary_key: &["id", "message_id"],
};

static TICKETS_HISTORY: TableSchema = TableSchema {
    name: "tickets_history",
    source_fields: &[
        "id",
        "ticket_id",
        "type",
        "status",
        "agentid",
        "departmentid",
        "date_from",
        "date_to",
    ],
    columns: &[
        "id",
        "ticket_id",
        "type",
        "status",
        "agent_id",
        "department_id",
        "date_from",
        "date_to",
    ],
    json_fields: &[],
    primary_key: &["id"],
};

// ============================================================================
// v1 tables
// ============================================================================

// Report rows carry the day they were requested for as `date`

const AGENT_REPORT_FIELDS: &[&str] = &[
    "id",
    "contactid",
    "firstname",
    "lastname",
    "worktime",
    "answers",
    "answers_ph",
    "newAnswerAvgTime",
    "newAnswerAvgTimeSla",
    "nextAnswerAvgTime",
    "nextAnswerAvgTimeSla",
    "calls",
    "calls_ph",
    "missed_calls",
    "missed_calls_ph",
    "call_seconds",
    "call_seconds_ph",
    "chats",
    "chats_ph",
    "chat_answers",
    "chat_answers_ph",
    "missed_chats",
    "missed_chats_ph",
    "chat_pickup",
    "chatPickupAvgTime",
    "chatAvgTime",
    "not_ranked",
    "not_ranked_p",
    "not_ranked_ph",
    "rewards",
    "rewards_p",
    "rewards_ph",
    "punishments",
    "punishments_p",
    "punishments_ph",
    "created_tickets",
    "resolved_tickets",
    "u_chats",
    "u_calls",
    "notes",
    "firstAssignAvgTime",
    "firstAssignAvgTimeSla",
    "firstResolveAvgTime",
    "firstResolveAvgTimeSla",
    "calls_outgoing",
    "call_outgoing_seconds",
    "call_outgoing_avg_time",
    "call_pickup_avg_time",
    "call_avg_time",
    "calls_internal",
    "call_internal_avg_time",
    "call_internal_seconds",
    "o_calls",
    "date",
];

static AGENT_REPORT: TableSchema = TableSchema {
    name: "agent_report",
    source_fields: AGENT_REPORT_FIELDS,
    columns: AGENT_REPORT_FIELDS,
    json_fields: &[],
    primary_key: &["id", "date"],
};

const RANKING_FIELDS: &[&str] = &[
    "id",
    "rankingType",
    "datecreated",
    "conversationid",
    "agentcontactid",
    "agentEmail",
    "agent",
    "contactid",
    "requesterEmail",
    "requester",
    "comment",
    "date",
];

static RANKING_AGENTS_REPORT: TableSchema = TableSchema {
    name: "ranking_agents_report",
    source_fields: RANKING_FIELDS,
    columns: RANKING_FIELDS,
    json_fields: &[],
    primary_key: &["id"],
};

const AVAILABILITY_FIELDS: &[&str] = &[
    "id",
    "userid",
    "firstname",
    "lastname",
    "contactid",
    "departmentid",
    "department_name",
    "hours_online",
    "from_date",
    "to_date",
    "date",
];

static AGENT_AVAILABILITY: TableSchema = TableSchema {
    name: "agent_availability",
    source_fields: AVAILABILITY_FIELDS,
    columns: AVAILABILITY_FIELDS,
    json_fields: &[],
    primary_key: &["id", "date"],
};

static AGENT_AVAILABILITY_CHATS: TableSchema = TableSchema {
    name: "agent_availability_chats",
    source_fields: AVAILABILITY_FIELDS,
    columns: AVAILABILITY_FIELDS,
    json_fields: &[],
    primary_key: &["id", "date"],
};

static CALLS_AVAILABILITY: TableSchema = TableSchema {
    name: "calls_availability",
    source_fields: AVAILABILITY_FIELDS,
    columns: AVAILABILITY_FIELDS,
    json_fields: &[],
    primary_key: &["id", "date"],
};

const CONVERSATIONS_FIELDS: &[&str] = &[
    "conversationid",
    "code",
    "public_access_urlcode",
    "parent_conversationid",
    "departmentid",
    "channel_type",
    "status",
    "datecreated",
    "datechanged",
    "dateresolved",
    "last_activity",
    "owner_contactid",
    "owner_email",
    "owner_name",
    "agentid",
    "subject",
    "tags",
];

static CONVERSATIONS: TableSchema = TableSchema {
    name: "conversations",
    source_fields: CONVERSATIONS_FIELDS,
    columns: CONVERSATIONS_FIELDS,
    json_fields: &["tags"],
    primary_key: &["conversationid"],
};
