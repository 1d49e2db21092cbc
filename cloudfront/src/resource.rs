use serde::Serialize;

/// The path pattern that invalidates everything a distribution serves.
pub const INVALIDATE_ALL: &str = "/*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub domain_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    pub id:      String,
    pub origins: Vec<Origin>,
}

/// One page of `ListDistributions`, in the order the provider returned it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributionPage {
    pub items:        Vec<Distribution>,
    pub is_truncated: bool,
    pub next_marker:  Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationRequest {
    pub distribution_id:  String,
    pub caller_reference: String,
    pub paths:            Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidationResult {
    pub id:               String,
    pub status:           String,
    pub create_time:      String,
    pub location:         Option<String>,
    pub distribution_id:  String,
    pub caller_reference: String,
    pub paths:            Vec<String>,
}
