use qv_core::{Edge, NodeId, Operator, ParsedLine, SkipReason};

/// Carry-over registers threaded through a single forward pass.
///
/// Both registers only move when a line resolves to a complete edge, so a
/// skipped line never disturbs what later lines inherit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarryOver {
    last_origin: Option<NodeId>,
    last_destination: Option<NodeId>,
}

impl CarryOver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn last_origin(&self) -> Option<&NodeId> {
        self.last_origin.as_ref()
    }

    #[must_use]
    pub const fn last_destination(&self) -> Option<&NodeId> {
        self.last_destination.as_ref()
    }

    /// Fill in the endpoints `line` omits and advance the registers.
    ///
    /// Rules apply in order: a missing destination copies the written origin;
    /// a missing origin on a `>` line takes the previous destination; an
    /// origin that is still missing takes the previous origin.
    pub fn resolve(&mut self, line: ParsedLine) -> Result<Edge, SkipReason> {
        let ParsedLine {
            origin,
            operator,
            destination,
        } = line;

        let destination = destination.or_else(|| origin.clone());

        let mut origin = origin;
        if origin.is_none() && operator == Operator::Follow {
            origin.clone_from(&self.last_destination);
        }
        if origin.is_none() {
            origin.clone_from(&self.last_origin);
        }

        let Some(destination) = destination else {
            return Err(SkipReason::UnresolvedDestination);
        };
        let Some(origin) = origin else {
            return Err(SkipReason::UnresolvedOrigin);
        };

        self.last_origin = Some(origin.clone());
        self.last_destination = Some(destination.clone());
        Ok(Edge::new(origin, destination))
    }
}
