/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{bail, Result};

use crate::Color;

/// Represents the kind (or "role") that a chess piece can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Number of piece variants.
    pub const COUNT: usize = 6;

    /// The kinds a pawn may promote to, in the order they are generated.
    pub const PROMOTIONS: [Self; 4] = [Self::Knight, Self::Bishop, Self::Rook, Self::Queen];

    /// An array of all 6 [`PieceKind`]s, starting with Pawn.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [
            Self::Pawn,
            Self::Knight,
            Self::Bishop,
            Self::Rook,
            Self::Queen,
            Self::King,
        ]
    }

    #[inline(always)]
    const fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Self::Pawn,
            1 => Self::Knight,
            2 => Self::Bishop,
            3 => Self::Rook,
            4 => Self::Queen,
            _ => Self::King,
        }
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Returns `true` if a pawn may promote to this kind.
    ///
    /// # Example
    /// ```
    /// # use arbiter::PieceKind;
    /// assert!(PieceKind::Queen.is_promotion_target());
    /// assert!(PieceKind::Knight.is_promotion_target());
    /// assert!(!PieceKind::Pawn.is_promotion_target());
    /// assert!(!PieceKind::King.is_promotion_target());
    /// ```
    #[inline(always)]
    pub const fn is_promotion_target(&self) -> bool {
        matches!(self, Self::Knight | Self::Bishop | Self::Rook | Self::Queen)
    }

    /// Returns `true` if pieces of this kind track whether they have moved.
    ///
    /// Only pawns (double steps), rooks and kings (castling) care.
    #[inline(always)]
    pub const fn tracks_movement(&self) -> bool {
        matches!(self, Self::Pawn | Self::Rook | Self::King)
    }

    /// The lowercase name of this kind, such as `"knight"`.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    /// The uppercase letter for this kind, such as `'N'` for a knight.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

impl FromStr for PieceKind {
    type Err = anyhow::Error;
    /// Parses either a full name (`"queen"`) or a single letter (`"q"`), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        for kind in Self::all() {
            let letter = kind.char().to_ascii_lowercase().to_string();
            if lower == kind.name() || lower == letter {
                return Ok(kind);
            }
        }

        bail!("Invalid piece kind {s:?}. Expected a name like \"queen\" or a letter like \"q\"")
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl<T> Index<PieceKind> for [T; PieceKind::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: PieceKind) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<PieceKind> for [T; PieceKind::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: PieceKind) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

/// Represents a chess piece on the board, along with the state the rules need to remember about it.
///
/// Internally, this is packed into a single byte:
/// ```text
///     0 0 X M C K K K
///         | | | +-+-+-- Kind: [0,5]
///         | | +-------- Color: 0 = White, 1 = Black
///         | +---------- Moved: set once a pawn, rook, or king leaves its square
///         +------------ Checked: set once a king has ever been in check
/// ```
/// Pieces are values. Copying one out of the board and changing it never affects the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Piece(u8);

impl Piece {
    const KIND_MASK: u8 = 0b0000_0111;
    const COLOR_BIT: u8 = 3;
    const MOVED_FLAG: u8 = 1 << 4;
    const CHECKED_FLAG: u8 = 1 << 5;

    /// Creates a new, unmoved and never-checked [`Piece`].
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Color, Piece, PieceKind};
    /// let knight = Piece::new(Color::Black, PieceKind::Knight);
    /// assert_eq!(knight.color(), Color::Black);
    /// assert_eq!(knight.kind(), PieceKind::Knight);
    /// assert!(!knight.has_moved());
    /// ```
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self(((color as u8) << Self::COLOR_BIT) | kind as u8)
    }

    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        PieceKind::from_bits(self.0 & Self::KIND_MASK)
    }

    #[inline(always)]
    pub const fn color(&self) -> Color {
        if (self.0 >> Self::COLOR_BIT) & 1 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    #[inline(always)]
    pub const fn has_moved(&self) -> bool {
        self.0 & Self::MOVED_FLAG != 0
    }

    #[inline(always)]
    pub const fn has_been_checked(&self) -> bool {
        self.0 & Self::CHECKED_FLAG != 0
    }

    /// Returns a copy of this piece that remembers having moved.
    ///
    /// Pieces whose kind does not track movement are returned unchanged.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Color, Piece, PieceKind};
    /// let rook = Piece::new(Color::White, PieceKind::Rook).with_moved();
    /// assert!(rook.has_moved());
    ///
    /// let bishop = Piece::new(Color::White, PieceKind::Bishop).with_moved();
    /// assert!(!bishop.has_moved());
    /// ```
    #[inline(always)]
    pub const fn with_moved(self) -> Self {
        if self.kind().tracks_movement() {
            Self(self.0 | Self::MOVED_FLAG)
        } else {
            self
        }
    }

    /// Returns a copy of this piece that remembers having been in check.
    ///
    /// Only kings can be checked, so anything else is returned unchanged.
    #[inline(always)]
    pub const fn with_checked(self) -> Self {
        if self.is_king() {
            Self(self.0 | Self::CHECKED_FLAG)
        } else {
            self
        }
    }

    #[inline(always)]
    pub(crate) const fn without_checked(self) -> Self {
        Self(self.0 & !Self::CHECKED_FLAG)
    }

    /// Returns the piece a pawn of this color becomes when promoting to `kind`.
    ///
    /// The new piece has moved onto its square, so it is marked as moved where that applies.
    #[inline(always)]
    pub const fn promoted(self, kind: PieceKind) -> Self {
        Self::new(self.color(), kind).with_moved()
    }

    #[inline(always)]
    pub const fn is_pawn(&self) -> bool {
        matches!(self.kind(), PieceKind::Pawn)
    }

    #[inline(always)]
    pub const fn is_rook(&self) -> bool {
        matches!(self.kind(), PieceKind::Rook)
    }

    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind(), PieceKind::King)
    }

    /// The letter for this piece: uppercase for White, lowercase for Black.
    #[inline(always)]
    pub const fn char(&self) -> char {
        let c = self.kind().char();
        if self.color().is_white() {
            c
        } else {
            c.to_ascii_lowercase()
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color(), self.kind())?;
        if self.has_moved() {
            write!(f, " (moved)")?;
        }
        if self.has_been_checked() {
            write!(f, " (checked)")?;
        }
        Ok(())
    }
}
