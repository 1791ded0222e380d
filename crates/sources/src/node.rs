//! Closed set of status source kinds

use crate::{BuildError, CompositeSwitchStatus, DigitalStatus, FieldSetStatus};
use switchwatch_core::{
    SampleOutcome, SharedDigitalInput, StatusDeclaration, StatusKind, StatusLine, StatusSource,
};

/// Any status source the monitor knows how to build
#[derive(Debug)]
pub enum StatusNode {
    Digital(DigitalStatus),
    Composite(CompositeSwitchStatus),
    FieldSet(FieldSetStatus),
}

impl StatusNode {
    /// Build a node from one declaration, dispatching on its `type`
    pub fn build(decl: &StatusDeclaration, gpio: &SharedDigitalInput) -> Result<Self, BuildError> {
        let kind = match decl.status_kind() {
            None => return Err(BuildError::MissingType),
            Some(Err(raw)) => return Err(BuildError::UnknownType(raw)),
            Some(Ok(kind)) => kind,
        };

        match kind {
            StatusKind::Digital => DigitalStatus::from_declaration(decl, gpio).map(Self::Digital),
            StatusKind::Composite => {
                CompositeSwitchStatus::from_declaration(decl, gpio).map(Self::Composite)
            }
            StatusKind::FieldSet => FieldSetStatus::from_declaration(decl).map(Self::FieldSet),
        }
    }

    pub fn kind(&self) -> StatusKind {
        match self {
            StatusNode::Digital(_) => StatusKind::Digital,
            StatusNode::Composite(_) => StatusKind::Composite,
            StatusNode::FieldSet(_) => StatusKind::FieldSet,
        }
    }

    fn source(&self) -> &dyn StatusSource {
        match self {
            StatusNode::Digital(status) => status,
            StatusNode::Composite(status) => status,
            StatusNode::FieldSet(status) => status,
        }
    }

    fn source_mut(&mut self) -> &mut dyn StatusSource {
        match self {
            StatusNode::Digital(status) => status,
            StatusNode::Composite(status) => status,
            StatusNode::FieldSet(status) => status,
        }
    }
}

impl StatusSource for StatusNode {
    fn name(&self) -> Option<&str> {
        self.source().name()
    }

    fn sample(&mut self) -> SampleOutcome {
        self.source_mut().sample()
    }

    fn render_lines(&self) -> Vec<StatusLine> {
        self.source().render_lines()
    }
}
