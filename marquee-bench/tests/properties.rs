//! Device properties checked on the decoded LED and TX lines

use marquee_bench::{Bench, CapturedFrame};
use marquee_core::palette::{self, PALETTE};
use marquee_core::{CharCount, Config, DimmerLevel, Timing};

/// Long enough for an eight-cell frame plus the idle time
const FRAME_TIMEOUT_US: u64 = 20_000;

fn bench(config: Config) -> Bench {
    Bench::new(config, &Timing::default())
}

fn next(bench: &mut Bench) -> CapturedFrame {
    bench.next_frame(FRAME_TIMEOUT_US).unwrap()
}

#[test]
fn test_blank_frame_after_reset_for_every_size() {
    for count in [CharCount::Two, CharCount::Four, CharCount::Eight] {
        let mut bench = bench(Config {
            num_chars: count,
            ..Config::default()
        });

        let frame = next(&mut bench);
        assert_eq!(frame.len(), count.get());
        assert!(frame.is_blank());
        assert!(frame.colors().iter().all(Option::is_none));
    }
}

#[test]
fn test_first_frame_about_one_ms_after_reset() {
    let mut bench = bench(Config::default());
    let frame = next(&mut bench);
    let timing = Timing::default();

    // Idle time, the frame itself and the reset detection
    let start = frame.tick - timing.frame_ticks(2) - 1_000;
    assert!((19_000..=21_000).contains(&start), "started at {}", start);
}

#[test]
fn test_fifo_two() {
    let mut bench = bench(Config::default());
    assert_eq!(next(&mut bench).text(), "  ");

    bench.send(b"Cir");
    assert_eq!(next(&mut bench).text(), "ir");

    bench.send(b"o");
    assert_eq!(next(&mut bench).text(), "ro");
}

#[test]
fn test_fifo_four() {
    let mut bench = bench(Config {
        num_chars: CharCount::Four,
        ..Config::default()
    });
    next(&mut bench);

    bench.send(b"Cir");
    assert_eq!(next(&mut bench).text(), " Cir");
    bench.send(b"oX");
    assert_eq!(next(&mut bench).text(), "iroX");
}

#[test]
fn test_eight_digits() {
    let mut bench = bench(Config {
        num_chars: CharCount::Eight,
        ..Config::default()
    });
    next(&mut bench);

    bench.send(b"0123456789");
    let frame = bench.next_frame(2 * FRAME_TIMEOUT_US).unwrap();
    assert_eq!(frame.text(), "23456789");
}

#[test]
fn test_loopback_echo() {
    let mut bench = bench(Config {
        uart_loopback: true,
        ..Config::default()
    });
    let sent: Vec<u8> = (0..=255u8).step_by(7).collect();

    bench.send(&sent);
    let echoed = bench.echo(sent.len()).unwrap();
    assert_eq!(echoed, sent);
    assert_eq!(bench.echo_monitor().framing_errors(), 0);
    assert_eq!(bench.controller().tx_overruns(), 0);
}

#[test]
fn test_no_echo_without_loopback() {
    let mut bench = bench(Config::default());
    bench.send(b"quiet");
    assert!(bench.echo(5).unwrap().is_empty());
}

#[test]
fn test_external_refresh_waits_for_cr() {
    let mut bench = bench(Config {
        ext_refresh: true,
        num_chars: CharCount::Four,
        ..Config::default()
    });

    bench.expect_quiet(3_000).unwrap();
    bench.send(b"Hey");
    bench.expect_quiet(6_000).unwrap();

    bench.send(b"\r");
    assert_eq!(next(&mut bench).text(), " Hey");
    bench.expect_quiet(3_000).unwrap();
}

#[test]
fn test_cr_is_a_character_with_internal_refresh() {
    let mut bench = bench(Config::default());
    next(&mut bench);
    bench.send(b"a\r");
    assert_eq!(next(&mut bench).text(), "a ");
}

#[test]
fn test_fixed_color_commands() {
    let mut bench = bench(Config {
        num_chars: CharCount::Four,
        fixed_color: true,
        ..Config::default()
    });
    next(&mut bench);

    bench.send(&[0x87, b'D', b'a', 0x8A, b'n', 0x8F, b'i']);
    let frame = next(&mut bench);
    assert_eq!(frame.text(), "Dani");
    assert_eq!(
        frame.palette_indices(),
        vec![Some(7), Some(7), Some(10), Some(15)]
    );
}

#[test]
fn test_fixed_color_defaults_to_first_entry() {
    let mut bench = bench(Config {
        fixed_color: true,
        ..Config::default()
    });
    next(&mut bench);
    bench.send(b"OK");
    assert_eq!(next(&mut bench).palette_indices(), vec![Some(0), Some(0)]);
}

#[test]
fn test_drawn_colors_are_single_palette_entries() {
    let mut bench = bench(Config {
        num_chars: CharCount::Eight,
        ..Config::default()
    });
    next(&mut bench);

    for chunk in [&b"Marquee!"[..], b"#RGB@LED"] {
        bench.send(chunk);
        let frame = next(&mut bench);
        assert_eq!(frame.text().as_bytes(), chunk);
        // Mixed colors inside a cell would have failed decoding
        assert!(frame.palette_indices().iter().all(Option::is_some));
    }
}

#[test]
fn test_dimmer_scales_channels() {
    let dimmer = DimmerLevel::new(2).unwrap();
    let mut bench = bench(Config {
        fixed_color: true,
        dimmer,
        ..Config::default()
    });
    next(&mut bench);

    bench.send(&[0x83, b'W', b'w']);
    let frame = next(&mut bench);
    let expected = PALETTE[3].dimmed(2);
    assert_eq!(frame.colors(), vec![Some(expected), Some(expected)]);
    assert_eq!(palette::index_of(expected), None);
}

#[test]
fn test_reset_gap_between_frames() {
    let mut bench = bench(Config::default());
    next(&mut bench);
    for byte in *b"abc" {
        bench.send(&[byte]);
        next(&mut bench);
    }

    let gaps = bench.led().gaps_ns();
    assert_eq!(gaps.len(), 4);
    assert!(gaps.iter().all(|&gap| gap >= 50_000), "gaps {:?}", gaps);
}

#[test]
fn test_back_to_back_frames_keep_the_gap() {
    let mut bench = bench(Config {
        ext_refresh: true,
        ..Config::default()
    });

    // Second CR lands while the first frame is on the line
    bench.send(b"x\r\r");
    next(&mut bench);
    next(&mut bench);
    assert!(bench.led().gaps_ns()[1] >= 60_000);
}
