//! Built-in sample messages and analysis use cases.
//!
//! The valid samples populate every field the check battery inspects, so
//! they score 100 with the default configuration.

use serde::Serialize;

/// Admission message with header, event, patient, visit, next of kin and an
/// observation.
pub const ADT_A01: &str = "MSH|^~\\&|EPIC|GENERAL HOSPITAL|HIS|RECEIVING FACILITY|20240115103000||ADT^A01|MSG00001|P|2.5\r\
EVN|A01|20240115103000\r\
PID|1||123456789^^^GENHOSP^MR||DOE^JOHN^ALLEN||19800115|M|||123 MAIN ST^^ANYTOWN^CA^12345^USA||(555)555-1234|(555)555-5678||S||ACCT001|123-45-6789\r\
PV1|1|I|WARD1^101^A^GENHOSP||||1234^SMITH^JANE^^^DR|||MED\r\
NK1|1|DOE^JANE|SPO^SPOUSE|123 MAIN ST^^ANYTOWN^CA^12345|(555)555-1234\r\
OBX|1|NM|8302-2^BODY HEIGHT^LN||180|cm|||||F";

/// Lab result message with patient, order and observation segments.
pub const ORU_R01: &str = "MSH|^~\\&|LAB|GENERAL HOSPITAL|EHR|RECEIVING FACILITY|20240115120000||ORU^R01|MSG00002|P|2.5.1\r\
PID|1||123456789^^^GENHOSP^MR||DOE^JOHN^ALLEN||19800115|M\r\
OBR|1|ORD001|FIL001|CBC^COMPLETE BLOOD COUNT^L|||20240115090000\r\
OBX|1|NM|718-7^HEMOGLOBIN^LN||14.2|g/dL|13.5-17.5|N|||F";

/// Text that fails the structural gate.
pub const INVALID: &str = "This is not an HL7 message\nPID|1||123456";

/// Named sample messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// ADT^A01 admission
    Adt,
    /// ORU^R01 lab result
    Oru,
    /// Structurally invalid text
    Invalid,
}

impl SampleKind {
    /// All samples, in display order.
    pub const ALL: [Self; 3] = [Self::Adt, Self::Oru, Self::Invalid];

    /// Returns the raw message text.
    pub fn message(self) -> &'static str {
        match self {
            Self::Adt => ADT_A01,
            Self::Oru => ORU_R01,
            Self::Invalid => INVALID,
        }
    }

    /// Returns true when the sample is expected to pass the structural gate.
    pub fn is_well_formed(self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

/// A supported analysis scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UseCase {
    /// Short scenario name
    pub name: &'static str,
    /// What the analyzer is used for in this scenario
    pub description: &'static str,
}

/// Scenarios the analyzer is intended for.
pub const USE_CASES: &[UseCase] = &[
    UseCase {
        name: "Interface validation",
        description: "Check messages from a new interface before go-live",
    },
    UseCase {
        name: "Data quality monitoring",
        description: "Track the score of production feeds over time",
    },
    UseCase {
        name: "Registration audits",
        description: "Find missing demographics in ADT admissions and updates",
    },
    UseCase {
        name: "Vendor compliance",
        description: "Verify that senders declare a standard HL7 v2 version",
    },
    UseCase {
        name: "Migration testing",
        description: "Compare message quality before and after a system migration",
    },
];
