//! Labelled training examples.

/// A single training example: the network input and the output it should
/// produce.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub features: Vec<f64>,
    #[serde(rename = "multipleExpectation", alias = "targets")]
    pub targets: Vec<f64>,
}

impl Pattern {
    pub fn new<I, O>(features: I, targets: O) -> Self
    where
        I: Into<Vec<f64>>,
        O: Into<Vec<f64>>,
    {
        Pattern {
            features: features.into(),
            targets: targets.into(),
        }
    }
}

impl<I, O> From<(I, O)> for Pattern
where
    I: AsRef<[f64]>,
    O: AsRef<[f64]>,
{
    fn from((features, targets): (I, O)) -> Self {
        Pattern::new(features.as_ref(), targets.as_ref())
    }
}

/// The four patterns of the logical XOR function.
pub fn xor() -> Vec<Pattern> {
    vec![
        Pattern::new([0.0, 0.0], [0.0]),
        Pattern::new([0.0, 1.0], [1.0]),
        Pattern::new([1.0, 0.0], [1.0]),
        Pattern::new([1.0, 1.0], [0.0]),
    ]
}
