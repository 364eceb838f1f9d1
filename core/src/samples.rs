/// Prints `HELLO!` and a newline. Fifteen instructions, no jumps.
pub const HELLO: &str = r"; Prints HELLO! and a newline
start:
    LOAD r0, 'H'
    WRITE r0
    LOAD r0, 'E'
    WRITE r0
    LOAD r0, 'L'
    WRITE r0
    LOAD r0, 'L'
    WRITE r0
    LOAD r0, 'O'
    WRITE r0
    LOAD r0, '!'
    WRITE r0
    LOAD r0, '\n'
    WRITE r0
    HALT
";

/// Copies the input to the output until READ returns 0.
pub const ECHO: &str = r"; Echoes the input back
loop:
    READ r0
    CMP r0, 0
    JZ done
    WRITE r0
    JMP loop
done:
    HALT
";
