use beatmap_rs::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn test_v2_song_info() {
    let info = parse_song_info(include_str!("files/info_v2.dat")).expect("failed to parse info");
    assert_eq!(info.revision, InfoRevision::V210);
    assert_eq!(info.song_name, "Test Song");
    assert_eq!(info.song_sub_name, "Extended Mix");
    assert_eq!(info.song_author, "Some Artist");
    assert_eq!(info.mapper, "Mapper A");
    assert_eq!(info.audio.bpm, 128.0);
    assert_eq!(info.audio.song_filename, "song.egg");
    assert_eq!(info.song_time_offset, 0.25);
    assert_eq!(info.shuffle_period, 0.5);
    assert_eq!(info.environment_names.len(), 2);
    assert_eq!(
        info.contributors,
        vec![Contributor {
            name: "Lighter B".into(),
            role: "Lighter".into(),
            icon_path: "b.png".into(),
        }]
    );

    let summary: Vec<_> = info
        .difficulties
        .iter()
        .map(|difficulty| {
            (
                difficulty.characteristic.as_str(),
                difficulty.difficulty.as_str(),
                difficulty.rank,
            )
        })
        .collect();
    assert_eq!(
        summary,
        [
            ("Standard", "Hard", DifficultyRank::Hard),
            ("Standard", "ExpertPlus", DifficultyRank::ExpertPlus),
            ("OneSaber", "Expert", DifficultyRank::Expert),
        ]
    );

    let hard = &info.difficulties[0];
    assert_eq!(hard.note_jump_speed, 14.0);
    assert_eq!(hard.note_jump_offset, -0.5);
    assert_eq!(hard.environment_name_index, 1);
    assert_eq!(hard.beatmap_filename, "HardStandard.dat");

    let expert_plus = &info.difficulties[1];
    assert_eq!(expert_plus.label, "Finale");
    assert_eq!(expert_plus.note_jump_speed, 10.0);
}

#[test]
fn test_v4_song_info() {
    let info = parse_song_info(include_str!("files/info_v4.dat")).expect("failed to parse info");
    assert_eq!(info.revision, InfoRevision::V401);
    assert_eq!(info.song_name, "Test Song");
    assert_eq!(info.mapper, "Mapper A");
    assert_eq!(
        info.audio,
        AudioData {
            song_filename: "song.ogg".into(),
            song_duration: 180.5,
            audio_data_filename: "BPMInfo.dat".into(),
            bpm: 120.0,
            lufs: -8.5,
            preview_start_time: 30.0,
            preview_duration: 10.0,
            song_preview_filename: "preview.ogg".into(),
        }
    );

    let [expert_plus, unknown] = info.difficulties.as_slice() else {
        panic!("expected two difficulties");
    };
    assert_eq!(expert_plus.rank, DifficultyRank::ExpertPlus);
    assert_eq!(expert_plus.authors.lighters, vec!["Lighter B".to_owned()]);
    assert_eq!(expert_plus.lightshow_filename, "Lightshow.dat");
    assert_eq!(expert_plus.beatmap_filename, "ExpertPlusStandard.dat");
    // Unknown names fall back to the highest rank.
    assert_eq!(unknown.rank, DifficultyRank::ExpertPlus);
}

#[test]
fn test_jump_metrics_of_difficulty() {
    let info = parse_song_info(include_str!("files/info_v4.dat")).expect("failed to parse info");
    let difficulty = &info.difficulties[0];
    // 18 njs at 120 bpm halves down to a 1 beat half jump.
    let distance = difficulty.jump_distance(info.audio.bpm);
    assert!((distance - 18.0).abs() < 1e-3);
    assert!((difficulty.reaction_time_ms(info.audio.bpm) - 500.0).abs() < 1e-3);
}

#[test]
fn test_audio_info() {
    let audio = parse_audio_info(include_str!("files/audio.dat")).expect("failed to parse audio");
    assert_eq!(audio.version, "4.0.0");
    assert_eq!(audio.song_frequency, 44100);
    assert_eq!(audio.song_sample_count, 264600);
    assert_eq!(audio.bpm_data.len(), 2);
    assert_eq!(audio.lufs_data[0].loudness, -8.5);

    let context = audio.to_bpm_context(120.0, 0.0);
    let tempos: Vec<_> = context
        .changes()
        .iter()
        .map(|change| (change.beat, change.bpm.round()))
        .collect();
    assert_eq!(tempos, [(0.0, 120.0), (4.0, 180.0)]);
    // The second segment ends 4 seconds into the song.
    assert!((context.beat_to_real_time(10.0, true) - 4.0).abs() < 1e-3);
}

#[test]
fn test_audio_tempo_ignores_default_bpm() {
    let audio = parse_audio_info(include_str!("files/audio.dat")).expect("failed to parse audio");
    let context = audio.to_bpm_context(100.0, 0.0);
    assert!((context.bpm() - 120.0).abs() < 1e-3);
    assert!((context.beat_to_real_time(10.0, false) - 5.0).abs() < 1e-3);
    assert!((context.to_document_time(10.0) - 8.0).abs() < 1e-3);

    let reference = audio.to_bpm_context(120.0, 0.0);
    assert_eq!(
        context.beat_to_real_time(10.0, false),
        reference.beat_to_real_time(10.0, false)
    );
    assert_eq!(context.to_document_time(10.0), reference.to_document_time(10.0));
}

#[test]
fn test_info_rejects_difficulty_revision() {
    assert!(matches!(
        parse_song_info(r#"{ "version": "3.3.0" }"#),
        Err(ParseError::UnrecognizedRevision(token)) if token == "3.3.0"
    ));
    assert!(matches!(
        parse_audio_info("[]"),
        Err(ParseError::NotAnObject)
    ));
}
