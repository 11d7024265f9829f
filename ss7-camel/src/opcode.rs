//! CAP operation codes
//!
//! The opcode is a small integer carried in the Invoke component; it selects
//! which argument structure follows. Opcode numbers are stable across CAMEL
//! phases, but the argument shapes are not: the same number can carry
//! different members in different phases, so the argument tables in
//! [`crate::args`] are keyed by [`CamelVersion`] as well.

/// CAMEL application-context phase
///
/// Carried as explicit context rather than ambient state: every decode call
/// receives the version it should interpret arguments under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CamelVersion {
    V1,
    V2,
    V3,
}

impl CamelVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            CamelVersion::V1 => "CAMEL phase 1",
            CamelVersion::V2 => "CAMEL phase 2",
            CamelVersion::V3 => "CAMEL phase 3",
        }
    }
}

/// CAP operation code values
pub mod op {
    pub const INITIAL_DP: i64 = 0;
    pub const ASSIST_REQUEST_INSTRUCTIONS: i64 = 16;
    pub const ESTABLISH_TEMPORARY_CONNECTION: i64 = 17;
    pub const DISCONNECT_FORWARD_CONNECTION: i64 = 18;
    pub const CONNECT_TO_RESOURCE: i64 = 19;
    pub const CONNECT: i64 = 20;
    pub const RELEASE_CALL: i64 = 22;
    pub const REQUEST_REPORT_BCSM_EVENT: i64 = 23;
    pub const EVENT_REPORT_BCSM: i64 = 24;
    pub const COLLECT_INFORMATION: i64 = 27;
    pub const CONTINUE: i64 = 31;
    pub const INITIATE_CALL_ATTEMPT: i64 = 32;
    pub const RESET_TIMER: i64 = 33;
    pub const FURNISH_CHARGING_INFORMATION: i64 = 34;
    pub const APPLY_CHARGING: i64 = 35;
    pub const APPLY_CHARGING_REPORT: i64 = 36;
    pub const CALL_GAP: i64 = 41;
    pub const CALL_INFORMATION_REPORT: i64 = 44;
    pub const CALL_INFORMATION_REQUEST: i64 = 45;
    pub const SEND_CHARGING_INFORMATION: i64 = 46;
    pub const PLAY_ANNOUNCEMENT: i64 = 47;
    pub const PROMPT_AND_COLLECT_USER_INFORMATION: i64 = 48;
    pub const SPECIALIZED_RESOURCE_REPORT: i64 = 49;
    pub const CANCEL: i64 = 53;
    pub const ACTIVITY_TEST: i64 = 55;
    pub const INITIAL_DP_SMS: i64 = 60;
    pub const FURNISH_CHARGING_INFORMATION_SMS: i64 = 61;
    pub const CONNECT_SMS: i64 = 62;
    pub const REQUEST_REPORT_SMS_EVENT: i64 = 63;
    pub const EVENT_REPORT_SMS: i64 = 64;
    pub const CONTINUE_SMS: i64 = 65;
    pub const RELEASE_SMS: i64 = 66;
    pub const RESET_TIMER_SMS: i64 = 67;
    pub const ACTIVITY_TEST_GPRS: i64 = 70;
    pub const APPLY_CHARGING_GPRS: i64 = 71;
    pub const APPLY_CHARGING_REPORT_GPRS: i64 = 72;
    pub const CANCEL_GPRS: i64 = 73;
    pub const CONNECT_GPRS: i64 = 74;
    pub const CONTINUE_GPRS: i64 = 75;
    pub const ENTITY_RELEASED_GPRS: i64 = 76;
    pub const FURNISH_CHARGING_INFORMATION_GPRS: i64 = 77;
    pub const INITIAL_DP_GPRS: i64 = 78;
    pub const RELEASE_GPRS: i64 = 79;
    pub const EVENT_REPORT_GPRS: i64 = 80;
    pub const REQUEST_REPORT_GPRS_EVENT: i64 = 81;
    pub const RESET_TIMER_GPRS: i64 = 82;
    pub const SEND_CHARGING_INFORMATION_GPRS: i64 = 83;
}

/// Opcode → operation name, if recognized
pub fn opcode_name(code: i64) -> Option<&'static str> {
    use op::*;
    Some(match code {
        INITIAL_DP => "initialDP",
        ASSIST_REQUEST_INSTRUCTIONS => "assistRequestInstructions",
        ESTABLISH_TEMPORARY_CONNECTION => "establishTemporaryConnection",
        DISCONNECT_FORWARD_CONNECTION => "disconnectForwardConnection",
        CONNECT_TO_RESOURCE => "connectToResource",
        CONNECT => "connect",
        RELEASE_CALL => "releaseCall",
        REQUEST_REPORT_BCSM_EVENT => "requestReportBCSMEvent",
        EVENT_REPORT_BCSM => "eventReportBCSM",
        COLLECT_INFORMATION => "collectInformation",
        CONTINUE => "continue",
        INITIATE_CALL_ATTEMPT => "initiateCallAttempt",
        RESET_TIMER => "resetTimer",
        FURNISH_CHARGING_INFORMATION => "furnishChargingInformation",
        APPLY_CHARGING => "applyCharging",
        APPLY_CHARGING_REPORT => "applyChargingReport",
        CALL_GAP => "callGap",
        CALL_INFORMATION_REPORT => "callInformationReport",
        CALL_INFORMATION_REQUEST => "callInformationRequest",
        SEND_CHARGING_INFORMATION => "sendChargingInformation",
        PLAY_ANNOUNCEMENT => "playAnnouncement",
        PROMPT_AND_COLLECT_USER_INFORMATION => "promptAndCollectUserInformation",
        SPECIALIZED_RESOURCE_REPORT => "specializedResourceReport",
        CANCEL => "cancel",
        ACTIVITY_TEST => "activityTest",
        INITIAL_DP_SMS => "initialDPSMS",
        FURNISH_CHARGING_INFORMATION_SMS => "furnishChargingInformationSMS",
        CONNECT_SMS => "connectSMS",
        REQUEST_REPORT_SMS_EVENT => "requestReportSMSEvent",
        EVENT_REPORT_SMS => "eventReportSMS",
        CONTINUE_SMS => "continueSMS",
        RELEASE_SMS => "releaseSMS",
        RESET_TIMER_SMS => "resetTimerSMS",
        ACTIVITY_TEST_GPRS => "activityTestGPRS",
        APPLY_CHARGING_GPRS => "applyChargingGPRS",
        APPLY_CHARGING_REPORT_GPRS => "applyChargingReportGPRS",
        CANCEL_GPRS => "cancelGPRS",
        CONNECT_GPRS => "connectGPRS",
        CONTINUE_GPRS => "continueGPRS",
        ENTITY_RELEASED_GPRS => "entityReleasedGPRS",
        FURNISH_CHARGING_INFORMATION_GPRS => "furnishChargingInformationGPRS",
        INITIAL_DP_GPRS => "initialDPGPRS",
        RELEASE_GPRS => "releaseGPRS",
        EVENT_REPORT_GPRS => "eventReportGPRS",
        REQUEST_REPORT_GPRS_EVENT => "requestReportGPRSEvent",
        RESET_TIMER_GPRS => "resetTimerGPRS",
        SEND_CHARGING_INFORMATION_GPRS => "sendChargingInformationGPRS",
        _ => return None,
    })
}

/// CAP error codes carried in ReturnError components
pub fn error_name(code: i64) -> Option<&'static str> {
    Some(match code {
        0 => "canceled",
        1 => "cancelFailed",
        3 => "eTCFailed",
        4 => "improperCallerResponse",
        6 => "missingCustomerRecord",
        7 => "missingParameter",
        8 => "parameterOutOfRange",
        10 => "requestedInfoError",
        11 => "systemFailure",
        12 => "taskRefused",
        13 => "unavailableResource",
        14 => "unexpectedComponentSequence",
        15 => "unexpectedDataValue",
        16 => "unexpectedParameter",
        17 => "unknownLegID",
        50 => "unknownCSID",
        51 => "unknownPDPID",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_names() {
        assert_eq!(opcode_name(op::INITIAL_DP), Some("initialDP"));
        assert_eq!(opcode_name(op::CONTINUE), Some("continue"));
        assert_eq!(opcode_name(op::APPLY_CHARGING), Some("applyCharging"));
        assert_eq!(opcode_name(op::CANCEL), Some("cancel"));
        assert_eq!(opcode_name(op::ACTIVITY_TEST), Some("activityTest"));
        assert_eq!(opcode_name(999), None);
    }

    #[test]
    fn test_error_names() {
        assert_eq!(error_name(11), Some("systemFailure"));
        assert_eq!(error_name(2), None);
    }
}
