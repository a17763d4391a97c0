//! Seirawan chess: gating, reserve bookkeeping and the eight-field FEN.

use gatehouse_core::{Color, Piece, Square};
use gatehouse_engine::{Game, MoveDescription, MoveListing, MoveOptions, VariantKind};

const START: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR SSSSSSSSssssssss EHeh w KQkq - 0 1";

fn load(fen: &str) -> Game {
    let mut game = Game::for_variant(VariantKind::Seirawan);
    assert!(game.load(fen), "rejected {}", fen);
    assert_eq!(game.fen(), fen);
    game
}

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

#[test]
fn start_position_offers_gated_knight_moves() {
    let game = Game::for_variant(VariantKind::Seirawan);
    assert_eq!(game.fen(), START);

    let moves = game.moves();
    assert_eq!(moves.len(), 28);
    for san in ["Nf3/H", "Nf3/E", "Nc3/H", "Na3/E", "e4"] {
        assert!(moves.iter().any(|m| m == san), "missing {}", san);
    }

    let options = MoveOptions {
        square: Some(sq("e2")),
        verbose: false,
    };
    assert_eq!(
        game.moves_with(&options),
        MoveListing::San(vec!["e3".to_string(), "e4".to_string()])
    );
}

#[test]
fn gating_fills_the_vacated_square() {
    let mut game = Game::for_variant(VariantKind::Seirawan);
    let record = game.make_move("Nf3/H").unwrap();
    assert_eq!(record.gate.map(|g| (g.piece, g.square)), Some((Piece::Hawk, sq("g1"))));
    assert_eq!(
        game.fen(),
        "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKBHR SSSSSS-Sssssssss Eeh b KQkq - 1 1"
    );
    assert_eq!(game.gate_reserve(Color::White), vec![Piece::Elephant]);
    assert_eq!(game.gate_reserve(Color::Black), vec![Piece::Elephant, Piece::Hawk]);

    let description = MoveDescription::new(sq("b8"), sq("c6")).with_gate(Piece::Elephant, None);
    let record = game.make_move(description).unwrap();
    assert_eq!(record.san, "Nc6/E");
    assert_eq!(
        game.fen(),
        "rebqkbnr/pppppppp/2n5/8/8/5N2/PPPPPPPP/RNBQKBHR SSSSSS-Ss-ssssss Eh w KQkq - 2 2"
    );

    // The hawk's square is no longer a gate, and a used piece is never offered.
    assert!(!game.moves().iter().any(|m| m.contains("/H")));
    assert!(game.moves().iter().any(|m| m == "Nc3/E"));

    game.undo();
    game.undo();
    assert_eq!(game.fen(), START);
}

#[test]
fn castling_gates_on_either_origin() {
    let fen = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R S---S--Ss---s--s EHeh w KQkq - 0 1";
    let mut game = load(fen);

    let mut castles: Vec<String> = game
        .moves()
        .into_iter()
        .filter(|m| m.starts_with("O-O"))
        .collect();
    castles.sort();
    let mut expected = vec![
        "O-O", "O-O/E", "O-O/H", "O-O/Eh1", "O-O/Hh1", "O-O-O", "O-O-O/E", "O-O-O/H",
        "O-O-O/Ea1", "O-O-O/Ha1",
    ];
    expected.sort();
    assert_eq!(castles, expected);

    game.make_move("O-O/Eh1").unwrap();
    assert_eq!(
        game.fen(),
        "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R4RKE S-------s---s--s Heh b kq - 1 1"
    );
    game.undo();

    let description = MoveDescription::new(sq("e1"), sq("a1")).with_gate(Piece::Hawk, None);
    let record = game.make_move(description).unwrap();
    assert_eq!(record.san, "O-O-O/H");
    assert_eq!(
        game.fen(),
        "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/2KRH2R -------Ss---s--s Eeh b kq - 1 1"
    );
}

#[test]
fn promotion_uses_the_reserve() {
    let mut game = load("4k3/P7/8/8/8/8/8/4K3 ---------------- EHeh w - - 0 1");
    assert_eq!(game.moves().len(), 11);

    let record = game.make_move("a8=H").unwrap();
    assert_eq!(record.promotion, Some(Piece::Hawk));
    assert_eq!(game.fen(), "H3k3/8/8/8/8/8/8/4K3 ---------------- Eeh b - - 0 1");
    assert_eq!(game.gate_reserve(Color::White), vec![Piece::Elephant]);

    game.undo();
    assert_eq!(game.gate_reserve(Color::White), vec![Piece::Elephant, Piece::Hawk]);
}

#[test]
fn reserve_keeps_material_sufficient() {
    let game = load("4k3/8/8/8/8/8/8/4K3 ---------------- h w - - 0 1");
    assert!(!game.insufficient_material());

    let game = load("4k3/8/8/8/8/8/8/4K3 ---------------- - w - - 0 1");
    assert!(game.insufficient_material());
    assert!(game.in_draw());
}

#[test]
fn eight_field_fen_validation() {
    let game = Game::for_variant(VariantKind::Seirawan);
    assert!(game.validate_fen(START).valid);

    let six = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    assert_eq!(game.validate_fen(six).error_number, 1);

    let short_markers =
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR SSSSSSSS EHeh w KQkq - 0 1";
    assert_eq!(game.validate_fen(short_markers).error_number, 15);

    let bad_reserve =
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR SSSSSSSSssssssss HE w KQkq - 0 1";
    assert_eq!(game.validate_fen(bad_reserve).error_number, 16);
}

#[test]
fn ascii_shows_reserve() {
    let game = Game::for_variant(VariantKind::Seirawan);
    assert!(game.ascii().ends_with("   reserve: EHeh\n"));
}

#[test]
fn auxiliary_pieces_can_be_placed() {
    let mut game = Game::for_variant(VariantKind::Seirawan);
    game.clear();
    assert_eq!(game.fen(), "8/8/8/8/8/8/8/8 ---------------- - w - - 0 1");
    game.put(Piece::King, Color::White, "e1").unwrap();
    game.put(Piece::King, Color::Black, "e8").unwrap();
    game.put(Piece::Elephant, Color::White, "e4").unwrap();
    assert!(!game.in_check());
    assert_eq!(
        game.fen(),
        "4k3/8/8/8/4E3/8/8/4K3 ---------------- - w - - 0 1"
    );

    game.make_move("Ee7+").unwrap();
    assert!(game.in_check());
}
