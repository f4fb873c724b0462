/// One touch callback, reduced to the axis the active policy tracks.
///
/// The low-level touch detector produces one of these per down/move/up event. It is a plain
/// value and is never kept around past the call it was passed to.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GestureSignal {
    /// Distance travelled since the touch went down, in logical pixels along the tracked axis.
    ///
    /// Screen coordinates: positive is down or right.
    pub displacement: f64,
    /// Velocity along the tracked axis in logical pixels per second.
    pub velocity: f64,
    /// Whether the detector classified the release as a fling.
    pub is_fling: bool,
    /// Whether the touch started on the system edge the policy cares about (bottom bar in
    /// portrait, navigation bar in landscape).
    pub edge_origin: bool,
    /// Absolute touch coordinate along the tracked axis.
    pub position: f64,
}

impl GestureSignal {
    /// Signal for a touch going down at `position`.
    pub fn down(position: f64) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Signal for a move event with the given displacement and velocity.
    pub fn moved(displacement: f64, velocity: f64) -> Self {
        Self {
            displacement,
            velocity,
            ..Default::default()
        }
    }

    /// Signal for a release with the given velocity and fling classification.
    pub fn released(displacement: f64, velocity: f64, is_fling: bool) -> Self {
        Self {
            displacement,
            velocity,
            is_fling,
            ..Default::default()
        }
    }

    pub fn with_edge_origin(mut self) -> Self {
        self.edge_origin = true;
        self
    }

    pub fn at(mut self, position: f64) -> Self {
        self.position = position;
        self
    }
}
