use burn::{
    nn::{loss::CrossEntropyLossConfig, Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::relu,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct MlpConfig {
    /// Input features per image (784 for flattened 28×28 MNIST)
    pub num_inputs: usize,
    /// Number of output classes (10 digits)
    pub num_classes: usize,
    /// Width of both hidden layers
    #[config(default = 512)]
    pub hidden_size: usize,
    /// Dropout probability after each hidden activation
    #[config(default = 0.2)]
    pub dropout: f64,
}

impl MlpConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Mlp<B> {
        Mlp {
            fc1: LinearConfig::new(self.num_inputs, self.hidden_size).init(device),
            fc2: LinearConfig::new(self.hidden_size, self.hidden_size).init(device),
            output: LinearConfig::new(self.hidden_size, self.num_classes).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
        }
    }
}

/// The classic MNIST multilayer perceptron:
/// 784 → 512 → 512 → 10 with ReLU activations and dropout.
///
/// The output layer produces raw logits; softmax is folded into
/// the cross-entropy loss (and is unnecessary for argmax
/// predictions, since softmax is monotonic).
#[derive(Module, Debug)]
pub struct Mlp<B: Backend> {
    pub fc1: Linear<B>,
    pub fc2: Linear<B>,
    pub output: Linear<B>,
    pub dropout: Dropout,
}

impl<B: Backend> Mlp<B> {
    /// images: [batch, num_inputs] → logits: [batch, num_classes]
    ///
    /// Dropout is only active on an autodiff backend, so calling
    /// this through `model.valid()` automatically disables it.
    pub fn forward(&self, images: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.dropout.forward(relu(self.fc1.forward(images)));
        let x = self.dropout.forward(relu(self.fc2.forward(x)));
        self.output.forward(x)
    }

    /// Forward pass plus cross-entropy loss against the labels.
    pub fn forward_loss(
        &self,
        images: Tensor<B, 2>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(images);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::Distribution;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let model: Mlp<TestBackend> = MlpConfig::new(784, 10)
            .with_hidden_size(32)
            .init(&device);

        let images = Tensor::<TestBackend, 2>::random([4, 784], Distribution::Default, &device);
        let logits = model.forward(images);
        assert_eq!(logits.dims(), [4, 10]);
    }

    #[test]
    fn test_forward_loss_is_finite() {
        let device = Default::default();
        let model: Mlp<TestBackend> = MlpConfig::new(16, 3).with_hidden_size(8).init(&device);

        let images = Tensor::<TestBackend, 2>::random([2, 16], Distribution::Default, &device);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([0, 2], &device);

        let (loss, logits) = model.forward_loss(images, targets);
        assert_eq!(logits.dims(), [2, 3]);

        let loss_val: f32 = loss.into_scalar().elem();
        assert!(loss_val.is_finite());
        assert!(loss_val >= 0.0);
    }
}
