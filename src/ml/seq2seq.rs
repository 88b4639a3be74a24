use burn::{
    nn::{loss::CrossEntropyLossConfig, Linear, LinearConfig, Lstm, LstmConfig, LstmState},
    prelude::*,
};

use crate::data::vocab::PAD_ID;

#[derive(Config, Debug)]
pub struct Seq2SeqConfig {
    /// One-hot width of the source side (source vocabulary size)
    pub source_vocab_size: usize,
    /// One-hot width of the target side (target vocabulary size)
    pub target_vocab_size: usize,
    /// Hidden size shared by the encoder and decoder LSTMs.
    /// They must match: the encoder's final state becomes the
    /// decoder's initial state.
    #[config(default = 256)]
    pub latent_size: usize,
}

impl Seq2SeqConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Seq2SeqModel<B> {
        Seq2SeqModel {
            encoder: LstmConfig::new(self.source_vocab_size, self.latent_size, true).init(device),
            decoder: LstmConfig::new(self.target_vocab_size, self.latent_size, true).init(device),
            output: LinearConfig::new(self.latent_size, self.target_vocab_size).init(device),
        }
    }
}

/// Character-level encoder/decoder translation model.
///
/// The encoder LSTM reads the one-hot source sequence and its
/// final (hidden, cell) state becomes the whole representation
/// of the sentence. The decoder LSTM starts from that state and
/// emits one hidden vector per target step; a shared Linear
/// projection turns each into target-character logits.
#[derive(Module, Debug)]
pub struct Seq2SeqModel<B: Backend> {
    pub encoder: Lstm<B>,
    pub decoder: Lstm<B>,
    pub output: Linear<B>,
}

impl<B: Backend> Seq2SeqModel<B> {
    /// Compress a source batch into the encoder's final state.
    ///
    /// encoder_inputs: [batch, src_len, src_vocab]
    /// → state tensors: [batch, latent]
    pub fn encode(&self, encoder_inputs: Tensor<B, 3>) -> LstmState<B, 2> {
        let (_outputs, state) = self.encoder.forward(encoder_inputs, None);
        state
    }

    /// Run the decoder for a single step.
    ///
    /// prev_char: one-hot [batch, 1, tgt_vocab] — the previously
    /// emitted character (or the start sentinel on the first step).
    /// Returns the logits [batch, tgt_vocab] for the next character
    /// and the updated state to carry into the following step.
    pub fn decode_step(
        &self,
        prev_char: Tensor<B, 3>,
        state: LstmState<B, 2>,
    ) -> (Tensor<B, 2>, LstmState<B, 2>) {
        let (hidden, next_state) = self.decoder.forward(prev_char, Some(state));
        let [batch, _step, latent] = hidden.dims();
        let logits = self.output.forward(hidden.reshape([batch, latent]));
        (logits, next_state)
    }

    /// Teacher-forcing forward pass over a whole batch.
    ///
    /// The decoder reads the TRUE previous characters
    /// (`decoder_inputs`), not its own predictions — that is what
    /// makes training parallel over the time dimension and stable
    /// early on.
    ///
    /// encoder_inputs: [batch, src_len, src_vocab]
    /// decoder_inputs: [batch, dec_len, tgt_vocab]
    /// → logits: [batch, dec_len, tgt_vocab]
    pub fn forward(
        &self,
        encoder_inputs: Tensor<B, 3>,
        decoder_inputs: Tensor<B, 3>,
    ) -> Tensor<B, 3> {
        let state = self.encode(encoder_inputs);
        let (hidden, _) = self.decoder.forward(decoder_inputs, Some(state));
        self.output.forward(hidden)
    }

    /// Forward pass plus cross-entropy against the shifted targets.
    /// Pad positions carry PAD_ID and are masked out of the loss,
    /// so short sentences in a padded batch contribute nothing
    /// past their stop sentinel.
    pub fn forward_loss(
        &self,
        encoder_inputs: Tensor<B, 3>,
        decoder_inputs: Tensor<B, 3>,
        targets: Tensor<B, 2, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 3>) {
        let logits = self.forward(encoder_inputs, decoder_inputs);
        let [batch, steps, vocab] = logits.dims();

        // The loss works on [N, classes] rows, so flatten batch × time
        let loss = CrossEntropyLossConfig::new()
            .with_pad_tokens(Some(vec![PAD_ID]))
            .init(&logits.device())
            .forward(
                logits.clone().reshape([batch * steps, vocab]),
                targets.reshape([batch * steps]),
            );

        (loss, logits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::Distribution;

    type TestBackend = burn::backend::NdArray;

    fn tiny_model(device: &<TestBackend as Backend>::Device) -> Seq2SeqModel<TestBackend> {
        Seq2SeqConfig::new(7, 9).with_latent_size(16).init(device)
    }

    #[test]
    fn test_encode_state_shape() {
        let device = Default::default();
        let model = tiny_model(&device);

        let src = Tensor::<TestBackend, 3>::random([3, 5, 7], Distribution::Default, &device);
        let state = model.encode(src);
        assert_eq!(state.hidden.dims(), [3, 16]);
        assert_eq!(state.cell.dims(), [3, 16]);
    }

    #[test]
    fn test_decode_step_shapes() {
        let device = Default::default();
        let model = tiny_model(&device);

        let src = Tensor::<TestBackend, 3>::random([2, 4, 7], Distribution::Default, &device);
        let state = model.encode(src);

        let prev = Tensor::<TestBackend, 3>::zeros([2, 1, 9], &device);
        let (logits, next_state) = model.decode_step(prev, state);
        assert_eq!(logits.dims(), [2, 9]);
        assert_eq!(next_state.hidden.dims(), [2, 16]);
    }

    #[test]
    fn test_teacher_forcing_forward_shape() {
        let device = Default::default();
        let model = tiny_model(&device);

        let src = Tensor::<TestBackend, 3>::random([2, 5, 7], Distribution::Default, &device);
        let dec = Tensor::<TestBackend, 3>::random([2, 6, 9], Distribution::Default, &device);
        let logits = model.forward(src, dec);
        assert_eq!(logits.dims(), [2, 6, 9]);
    }

    #[test]
    fn test_forward_loss_is_finite() {
        let device = Default::default();
        let model = tiny_model(&device);

        let src = Tensor::<TestBackend, 3>::random([2, 3, 7], Distribution::Default, &device);
        let dec = Tensor::<TestBackend, 3>::random([2, 4, 9], Distribution::Default, &device);
        // Last position of the second sample is padding
        let targets = Tensor::<TestBackend, 1, Int>::from_ints(
            [3, 4, 5, 2, 6, 7, 2, PAD_ID as i32],
            &device,
        )
        .reshape([2, 4]);

        let (loss, logits) = model.forward_loss(src, dec, targets);
        assert_eq!(logits.dims(), [2, 4, 9]);

        let loss_val: f32 = loss.into_scalar().elem();
        assert!(loss_val.is_finite());
        assert!(loss_val >= 0.0);
    }
}
