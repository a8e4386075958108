//! cpal output backend
//!
//! The output stream is opened lazily on a dedicated thread the first time a
//! note needs to sound. Everything the UI asks for is forwarded to the
//! engine through the [`MessageBus`].

use std::thread::{self, JoinHandle};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat, Stream};
use crossbeam_channel::{bounded, Receiver, Sender};

use crate::core::backend::{Activation, ActivationResolver, ActivationState, AudioBackend};
use crate::core::note::NoteId;
use crate::core::params::{db_to_gain, Envelope, SynthParams, Waveform, PARAM_GLIDE_SECS};
use crate::core::synth::SynthEngine;
use crate::error::{Error, Result};
use crate::messaging::{EngineMessage, MessageBus};

/// Upper bound on messages applied per audio buffer
const MAX_MESSAGES_PER_BUFFER: usize = 64;

struct AudioWorker {
    activation: Activation,
    shutdown: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl AudioWorker {
    fn stop(&mut self) {
        let _ = self.shutdown.try_send(());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("audio thread panicked");
            }
        }
    }
}

pub struct CpalBackend {
    params: SynthParams,
    max_polyphony: usize,
    bus: MessageBus,
    worker: Option<AudioWorker>,
}

impl CpalBackend {
    pub fn new(params: SynthParams, max_polyphony: usize) -> Self {
        Self {
            params,
            max_polyphony,
            bus: MessageBus::new(),
            worker: None,
        }
    }

    /// True while a stream is starting or running; otherwise nobody drains the bus
    fn is_live(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !matches!(worker.activation.state(), ActivationState::Failed(_)))
    }

    fn send(&self, msg: EngineMessage) {
        if self.is_live() {
            self.bus.send(msg);
        } else {
            log::trace!("no audio stream, skipping {:?}", msg);
        }
    }

    fn spawn_worker(&mut self) -> Activation {
        // The new engine starts from a fresh params snapshot
        let stale = self.bus.clear();
        if stale > 0 {
            log::debug!("discarded {} stale engine messages", stale);
        }

        let (activation, resolver) = Activation::pending();
        let (shutdown, shutdown_rx) = bounded(1);
        let params = self.params.clone();
        let max_polyphony = self.max_polyphony;
        let bus = self.bus.clone();

        let spawned = thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || run_output(params, max_polyphony, bus, resolver, shutdown_rx));

        match spawned {
            Ok(handle) => {
                self.worker = Some(AudioWorker {
                    activation: activation.clone(),
                    shutdown,
                    handle: Some(handle),
                });
                activation
            }
            Err(err) => Activation::failed(format!("could not spawn audio thread: {}", err)),
        }
    }
}

impl Drop for CpalBackend {
    fn drop(&mut self) {
        if let Some(mut worker) = self.worker.take() {
            worker.stop();
        }
    }
}

impl AudioBackend for CpalBackend {
    fn activate(&mut self) -> Activation {
        if let Some(worker) = &mut self.worker {
            if !matches!(worker.activation.state(), ActivationState::Failed(_)) {
                return worker.activation.clone();
            }
            worker.stop();
            self.worker = None;
        }
        self.spawn_worker()
    }

    fn trigger_attack(&mut self, note: NoteId) {
        self.send(EngineMessage::NoteOn(note));
    }

    fn trigger_release(&mut self, note: NoteId) {
        self.send(EngineMessage::NoteOff(note));
    }

    fn release_all(&mut self) {
        self.send(EngineMessage::AllNotesOff);
    }

    fn params(&self) -> &SynthParams {
        &self.params
    }

    fn set_waveform(&mut self, waveform: Waveform) {
        self.params.waveform = waveform;
        self.send(EngineMessage::SetWaveform(waveform));
    }

    fn set_filter_cutoff(&mut self, hz: f32) {
        self.params.filter_cutoff_hz = hz;
        self.send(EngineMessage::SetFilterCutoff { hz, glide_secs: PARAM_GLIDE_SECS });
    }

    fn set_filter_resonance(&mut self, q: f32) {
        self.params.filter_resonance = q;
        self.send(EngineMessage::SetFilterResonance { q, glide_secs: PARAM_GLIDE_SECS });
    }

    fn set_envelope(&mut self, envelope: Envelope) {
        self.params.envelope = envelope;
        self.send(EngineMessage::SetEnvelope(envelope));
    }

    fn set_gain_db(&mut self, db: f32) {
        self.params.volume_db = db;
        self.send(EngineMessage::SetGain(db_to_gain(db)));
    }
}

/// Body of the audio thread: open the stream, report, then keep it alive
fn run_output(
    params: SynthParams,
    max_polyphony: usize,
    bus: MessageBus,
    resolver: ActivationResolver,
    shutdown: Receiver<()>,
) {
    match open_stream(&params, max_polyphony, bus) {
        Ok(stream) => {
            log::info!("audio stream started");
            resolver.resolve(Ok(()));
            // Blocks until the backend is dropped or replaced
            let _ = shutdown.recv();
            drop(stream);
            log::info!("audio stream stopped");
        }
        Err(err) => {
            log::warn!("could not start audio stream: {}", err);
            resolver.resolve(Err(err.to_string()));
        }
    }
}

fn open_stream(params: &SynthParams, max_polyphony: usize, bus: MessageBus) -> Result<Stream> {
    let host = cpal::default_host();
    log::info!("using audio host: {}", host.id().name());

    let device = host.default_output_device().ok_or(Error::NoOutputDevice)?;
    log::info!("using output device: {:?}", device.name());

    let config = device.default_output_config()?;
    log::debug!("device config: {:?}", config);

    let sample_format = config.sample_format();
    let config = cpal::StreamConfig::from(config);
    let engine = SynthEngine::new(config.sample_rate.0 as f32, params, max_polyphony);

    let stream = match sample_format {
        SampleFormat::F32 => create_stream::<f32>(&device, &config, engine, bus),
        SampleFormat::I16 => create_stream::<i16>(&device, &config, engine, bus),
        SampleFormat::U16 => create_stream::<u16>(&device, &config, engine, bus),
        other => return Err(Error::UnsupportedSampleFormat(format!("{:?}", other))),
    }?;

    stream.play()?;
    Ok(stream)
}

fn create_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut engine: SynthEngine,
    bus: MessageBus,
) -> Result<Stream>
where
    T: Sample + Send + 'static + cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let err_fn = |err: cpal::StreamError| log::warn!("an error occurred on the audio stream: {}", err);

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            bus.process_messages(&mut engine, MAX_MESSAGES_PER_BUFFER);

            for frame in data.chunks_mut(channels) {
                let value = T::from_sample(engine.next_sample());
                for sample in frame.iter_mut() {
                    *sample = value;
                }
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
