//! Calling an `FnOnce` with a tuple of already-captured arguments.

/// A callable that can consume an argument tuple `Args`, applied by position.
///
/// Implemented for every `FnOnce` taking up to eight arguments. Whatever the callable returns is
/// dropped.
pub trait Invoke<Args> {
    fn invoke(self, args: Args);
}

macro_rules! impl_invoke {
    ($($ty:ident $val:ident),*) => {
        impl<Func, Ret, $($ty,)*> Invoke<($($ty,)*)> for Func
        where
            Func: FnOnce($($ty),*) -> Ret,
        {
            fn invoke(self, ($($val,)*): ($($ty,)*)) {
                let _ = self($($val),*);
            }
        }
    };
}

impl_invoke!();
impl_invoke!(A1 a1);
impl_invoke!(A1 a1, A2 a2);
impl_invoke!(A1 a1, A2 a2, A3 a3);
impl_invoke!(A1 a1, A2 a2, A3 a3, A4 a4);
impl_invoke!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
impl_invoke!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);
impl_invoke!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7);
impl_invoke!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8);

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::Invoke;

    fn concat(a: &str, b: u8, c: char) -> String {
        format!("{}{}{}", a, b, c)
    }

    #[test]
    fn applies_in_declaration_order() {
        let out = RefCell::new(String::new());
        (|a: &str, b: u8, c: char| *out.borrow_mut() = concat(a, b, c)).invoke(("x", 7, 'z'));
        assert_eq!("x7z", *out.borrow());
    }

    #[test]
    fn zero_and_eight_arguments() {
        let hits = RefCell::new(0);
        (|| *hits.borrow_mut() += 1).invoke(());
        (|a: u8, b: u8, c: u8, d: u8, e: u8, f: u8, g: u8, h: u8| {
            *hits.borrow_mut() += u32::from(a + b + c + d + e + f + g + h)
        })
        .invoke((1, 2, 3, 4, 5, 6, 7, 8));
        assert_eq!(37, *hits.borrow());
    }

    #[test]
    fn return_value_is_discarded() {
        fn answer(x: u32) -> u32 {
            x * 2
        }
        answer.invoke((21,));
    }
}
