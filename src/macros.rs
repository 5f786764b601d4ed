#[macro_export]
macro_rules! sequence {
    ($($child:expr),* $(,)?) => {
        $crate::grammar::sequence(vec![ $($child),* ])
    };
}

#[macro_export]
macro_rules! choice {
    ($($child:expr),* $(,)?) => {
        $crate::grammar::choice(vec![ $($child),* ])
    };
}
