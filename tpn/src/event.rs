use bcdr_collections::create_id_type;

create_id_type!(
    /// A timepoint referenced by one or more [`crate::TpnConstraint`]s.
    /// Names are resolved to ids once, by whichever collaborator owns event
    /// naming (the problem facade); the network itself is name-agnostic.
    EventId
);
