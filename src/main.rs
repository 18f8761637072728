//! SSB Receiver Main Application
//!
//! Entry point for the STM32G474-based Si4735 receiver firmware.
//! Brings up the shared I2C bus, the tuner, the OLED and the inputs, spawns
//! the encoder task and runs the foreground polling loop.

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::info;
use embassy_executor::Spawner;
use embassy_futures::select::select;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::time::Hertz;
use embassy_time::Delay;
use embedded_hal_bus::i2c::RefCellDevice;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};
use {defmt_rtt as _, panic_probe as _};

use ssb_receiver::drivers::display::GlyphCanvas;
use ssb_receiver::drivers::si4735::Si4735;
use ssb_receiver::input::buttons::ButtonPanel;
use ssb_receiver::input::encoder::{QuadratureDecoder, ENCODER_DELTA};
use ssb_receiver::prelude::*;
use ssb_receiver::ui::screen::show_splash;

/// SSB patch staged by the build script
static SSB_PATCH: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/ssb_patch.bin"));

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("SSB Receiver Firmware v{}", env!("CARGO_PKG_VERSION"));

    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized");

    // PB8 = SCL, PB9 = SDA, shared by the tuner and the OLED
    let i2c = I2c::new_blocking(
        p.I2C1,
        p.PB8,
        p.PB9,
        Hertz(I2C_FREQUENCY_HZ),
        Default::default(),
    );
    let bus = RefCell::new(i2c);

    info!("I2C1 initialized at {} Hz", I2C_FREQUENCY_HZ);

    let reset = Output::new(p.PA8, Level::High, Speed::Low);
    let mut tuner = Si4735::new(RefCellDevice::new(&bus), reset, Delay);

    let interface = I2CDisplayInterface::new(RefCellDevice::new(&bus));
    let mut oled = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    if oled.init().is_err() {
        warn!("OLED init failed");
    }
    let mut display = GlyphCanvas::new(oled);

    let buttons = ButtonPanel::new([
        Input::new(p.PB0, Pull::Up),
        Input::new(p.PB1, Pull::Up),
        Input::new(p.PB2, Pull::Up),
        Input::new(p.PB10, Pull::Up),
        Input::new(p.PB11, Pull::Up),
        Input::new(p.PB12, Pull::Up),
        Input::new(p.PB13, Pull::Up),
        Input::new(p.PB14, Pull::Up),
        Input::new(p.PB15, Pull::Up),
    ]);
    let mut sampler = InputSampler::new(buttons, &ENCODER_DELTA);

    let encoder_a = ExtiInput::new(p.PA0, p.EXTI0, Pull::Up);
    let encoder_b = ExtiInput::new(p.PA1, p.EXTI1, Pull::Up);
    spawner.spawn(encoder_task(encoder_a, encoder_b)).unwrap();

    let mut delay = Delay;
    let mut ctx = ReceiverContext::new(SsbPatch::new(SSB_PATCH));
    ctx.power_on(&mut tuner, &mut delay);

    show_splash(&mut display, env!("CARGO_PKG_VERSION"));
    Timer::after_millis(SPLASH_DURATION_MS).await;
    ctx.redraw(&mut display);

    info!("Receiver ready, entering main loop");

    let mut signal_gate = IntervalGate::new(SIGNAL_POLL_INTERVAL_MS);
    loop {
        // Wrapping millisecond clock; the gates compare with wrapping_sub
        let now = Instant::now().as_millis() as u32;

        for event in sampler.poll(now) {
            ctx.handle(event, &mut tuner, &mut delay);
        }
        if signal_gate.ready(now) {
            ctx.poll_signal(&mut tuner);
        }
        ctx.render(&mut display);

        Timer::after_millis(LOOP_PERIOD_MS).await;
    }
}

/// Encoder task - decodes edges on both lines into the shared delta
#[embassy_executor::task]
async fn encoder_task(mut a: ExtiInput<'static>, mut b: ExtiInput<'static>) {
    let mut decoder = QuadratureDecoder::new();
    loop {
        select(a.wait_for_any_edge(), b.wait_for_any_edge()).await;
        // Lines idle high through the pull-ups; the decoder rests at 00
        if let Some(direction) = decoder.update(a.is_low(), b.is_low()) {
            ENCODER_DELTA.record(direction);
        }
    }
}
