use std::fmt;

/// Defines the target property an animation track drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    Translation, // ".position"
    Rotation,    // ".quaternion"
    Scale,       // ".scale"
    Weights,     // ".morphTargetInfluences" / ".weight"
}

impl TargetPath {
    /// Property suffix used in track names (without the leading dot).
    #[must_use]
    pub const fn property(self) -> &'static str {
        match self {
            TargetPath::Translation => "position",
            TargetPath::Rotation => "quaternion",
            TargetPath::Scale => "scale",
            TargetPath::Weights => "morphTargetInfluences",
        }
    }

    /// Parses a property suffix. Unknown properties yield `None`.
    #[must_use]
    pub fn from_property(property: &str) -> Option<Self> {
        match property {
            "position" => Some(TargetPath::Translation),
            "quaternion" => Some(TargetPath::Rotation),
            "scale" => Some(TargetPath::Scale),
            "morphTargetInfluences" | "weight" => Some(TargetPath::Weights),
            _ => None,
        }
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.property())
    }
}

/// A track name split into its node path and target property.
///
/// `"Armature/Hips/mixamorigSpine.quaternion"` has the node path
/// `"Armature/Hips/mixamorigSpine"`, the leaf `"mixamorigSpine"` and the
/// target [`TargetPath::Rotation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackBinding<'a> {
    pub node_path: &'a str,
    pub target: TargetPath,
}

impl<'a> TrackBinding<'a> {
    /// Splits `name` on its trailing `.property`. Returns `None` when the
    /// property is missing or not recognized.
    #[must_use]
    pub fn parse(name: &'a str) -> Option<Self> {
        let (node_path, property) = name.rsplit_once('.')?;
        if node_path.is_empty() {
            return None;
        }
        let target = TargetPath::from_property(property)?;
        Some(Self { node_path, target })
    }

    /// Last `/`-separated segment of the node path.
    #[must_use]
    pub fn leaf(&self) -> &'a str {
        self.node_path
            .rsplit_once('/')
            .map_or(self.node_path, |(_, leaf)| leaf)
    }

    /// Everything before the leaf, or `""` for a bare node name.
    #[must_use]
    pub fn parent_path(&self) -> &'a str {
        self.node_path
            .rsplit_once('/')
            .map_or("", |(parent, _)| parent)
    }
}

/// Builds a track name from a node path and target property.
#[must_use]
pub fn track_name(node_path: &str, target: TargetPath) -> String {
    format!("{node_path}.{}", target.property())
}
